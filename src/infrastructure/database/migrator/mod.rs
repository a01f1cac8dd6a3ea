//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_badges;
mod m20250101_000003_create_user_badges;
mod m20250101_000004_create_stations;
mod m20250101_000005_create_reservations;
mod m20250101_000006_create_campaigns;
mod m20250101_000007_create_campaign_target_badges;
mod m20250101_000008_create_station_forecasts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_badges::Migration),
            Box::new(m20250101_000003_create_user_badges::Migration),
            Box::new(m20250101_000004_create_stations::Migration),
            Box::new(m20250101_000005_create_reservations::Migration),
            Box::new(m20250101_000006_create_campaigns::Migration),
            Box::new(m20250101_000007_create_campaign_target_badges::Migration),
            Box::new(m20250101_000008_create_station_forecasts::Migration),
        ]
    }
}
