//! Database entities module

pub mod badge;
pub mod campaign;
pub mod campaign_target_badge;
pub mod reservation;
pub mod station;
pub mod station_forecast;
pub mod user;
pub mod user_badge;

pub use badge::Entity as Badge;
pub use campaign::Entity as Campaign;
pub use campaign_target_badge::Entity as CampaignTargetBadge;
pub use reservation::Entity as Reservation;
pub use station::Entity as Station;
pub use station_forecast::Entity as StationForecast;
pub use user::Entity as User;
pub use user_badge::Entity as UserBadge;
