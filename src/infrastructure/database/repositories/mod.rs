//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories backing the domain repository traits.

pub mod badge_repository;
pub mod campaign_repository;
pub mod forecast_repository;
pub mod reservation_repository;
pub mod station_repository;
pub mod user_repository;

pub use badge_repository::SeaOrmBadgeRepository;
pub use campaign_repository::SeaOrmCampaignRepository;
pub use forecast_repository::SeaOrmForecastRepository;
pub use reservation_repository::SeaOrmReservationRepository;
pub use station_repository::SeaOrmStationRepository;
pub use user_repository::SeaOrmUserRepository;
