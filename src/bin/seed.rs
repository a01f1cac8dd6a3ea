//!
//! Demo data seeder. Drops and recreates the schema, then loads the
//! demo catalog: badges, two demo accounts, the station network,
//! campaigns and a full weekly forecast per station.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use smartcharge::application::{
    ForecastModelBuilder, ProfileCatalog, Seeder, StationService,
};
use smartcharge::infrastructure::database::repositories::{
    SeaOrmBadgeRepository, SeaOrmCampaignRepository, SeaOrmForecastRepository,
    SeaOrmReservationRepository, SeaOrmStationRepository, SeaOrmUserRepository,
};
use smartcharge::infrastructure::database::Migrator;
use smartcharge::{default_config_path, init_database, AppConfig, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("SMARTCHARGE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Seeding database: {}", db_config.url);

    let db = init_database(&db_config).await?;

    info!("Recreating schema...");
    Migrator::fresh(&db).await?;

    let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
    let badges = Arc::new(SeaOrmBadgeRepository::new(db.clone()));
    let stations = Arc::new(SeaOrmStationRepository::new(db.clone()));
    let forecasts = Arc::new(SeaOrmForecastRepository::new(db.clone()));
    let campaigns = Arc::new(SeaOrmCampaignRepository::new(db.clone()));
    let reservations = Arc::new(SeaOrmReservationRepository::new(db.clone()));

    let builder = ForecastModelBuilder::new(ProfileCatalog::default())
        .with_history_days(app_cfg.forecast.history_days);
    let station_service = StationService::new(
        stations.clone(),
        forecasts,
        campaigns.clone(),
        reservations,
        users.clone(),
        builder,
    );

    let seeder = Seeder::new(users, badges, stations, campaigns);
    let summary = seeder.run(&station_service, app_cfg.forecast.seed).await?;

    info!(
        "Seed complete: {} users, {} badges, {} stations, {} campaigns, {} forecast entries",
        summary.users, summary.badges, summary.stations, summary.campaigns, summary.forecasts
    );
    info!("Demo accounts: info@zorlu.com / driver@test.com (password: demo123)");

    db.close().await?;
    Ok(())
}
