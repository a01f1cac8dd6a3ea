//! HTTP API layer
//!
//! Axum handlers, DTOs and the router. All endpoints return the
//! `ApiResponse` envelope; domain errors map to HTTP statuses in one
//! place (`dto::common::ApiError`).

pub mod dto;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use crate::application::{CampaignService, ReservationService, StationService, UserService};
use crate::auth::JwtConfig;

pub use router::{create_api_router, ApiDoc};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub stations: Arc<StationService>,
    pub campaigns: Arc<CampaignService>,
    pub users: Arc<UserService>,
    pub reservations: Arc<ReservationService>,
    pub jwt_config: JwtConfig,
}
