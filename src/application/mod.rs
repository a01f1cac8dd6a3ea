//! Application services
//!
//! Business logic built on the domain model and the repository traits:
//! forecasting, slot pricing, reservation settlement, station and campaign
//! management, user accounts and demo seeding.

pub mod campaigns;
pub mod forecast;
pub mod pricing;
pub mod seeder;
pub mod settlement;
pub mod stations;
pub mod users;

pub use campaigns::CampaignService;
pub use forecast::{ForecastModelBuilder, ProfileCatalog};
pub use seeder::Seeder;
pub use settlement::ReservationService;
pub use stations::StationService;
pub use users::{OperatorDomains, UserService};
