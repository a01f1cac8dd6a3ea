pub mod badge;
pub mod campaign;
pub mod error;
pub mod forecast;
pub mod repositories;
pub mod reservation;
pub mod station;
pub mod user;

// Re-export commonly used types
pub use badge::{Badge, NewBadge};
pub use campaign::{select_active, Campaign, CampaignStatus, NewCampaign};
pub use error::{DomainError, DomainResult};
pub use forecast::{day_of_week, ForecastEntry, SLOTS_PER_WEEK};
pub use repositories::{
    BadgeRepository, CampaignRepository, ForecastRepository, ReservationRepository,
    ReservationStats, StationRepository, UserRepository,
};
pub use reservation::{
    base_coins, NewReservation, Reservation, ReservationStatus, BASE_COINS, CO2_GREEN,
    CO2_STANDARD, GREEN_COINS, SETTLEMENT_XP,
};
pub use station::{
    classify_load, is_green_hour, DensityProfile, LoadStatus, NewStation, Station,
};
pub use user::{NewUser, User, UserRole};
