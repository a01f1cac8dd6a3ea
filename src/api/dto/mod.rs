//! API data transfer objects

pub mod campaign;
pub mod common;
pub mod reservation;
pub mod station;
pub mod user;

pub use common::{ApiError, ApiResponse, ApiResult};
