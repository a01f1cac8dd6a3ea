//! # SmartCharge Backend
//!
//! Backend for an EV charging platform that gamifies charging behavior
//! (coins, XP, CO2 savings, badges, campaigns) and steers drivers toward
//! low-congestion time slots.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, classification rules and repository traits
//! - **application**: Business logic (forecasting, slot pricing, settlement, CRUD services)
//! - **infrastructure**: External concerns (SeaORM persistence, in-memory storage)
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database helpers for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
