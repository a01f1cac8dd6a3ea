//!
//! SmartCharge backend server.
//! Reads configuration from TOML file (~/.config/smartcharge/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use smartcharge::application::{
    CampaignService, ForecastModelBuilder, OperatorDomains, ProfileCatalog, ReservationService,
    StationService, UserService,
};
use smartcharge::auth::JwtConfig;
use smartcharge::infrastructure::database::repositories::{
    SeaOrmBadgeRepository, SeaOrmCampaignRepository, SeaOrmForecastRepository,
    SeaOrmReservationRepository, SeaOrmStationRepository, SeaOrmUserRepository,
};
use smartcharge::infrastructure::database::Migrator;
use smartcharge::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("SMARTCHARGE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting SmartCharge backend...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "smartcharge".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories ───────────────────────────────────────────
    let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
    let badges = Arc::new(SeaOrmBadgeRepository::new(db.clone()));
    let stations = Arc::new(SeaOrmStationRepository::new(db.clone()));
    let forecasts = Arc::new(SeaOrmForecastRepository::new(db.clone()));
    let campaigns = Arc::new(SeaOrmCampaignRepository::new(db.clone()));
    let reservations = Arc::new(SeaOrmReservationRepository::new(db.clone()));

    // ── Services ───────────────────────────────────────────────
    let builder = ForecastModelBuilder::new(ProfileCatalog::default())
        .with_history_days(app_cfg.forecast.history_days);
    let station_service = Arc::new(StationService::new(
        stations.clone(),
        forecasts.clone(),
        campaigns.clone(),
        reservations.clone(),
        users.clone(),
        builder,
    ));
    let campaign_service = Arc::new(CampaignService::new(
        campaigns.clone(),
        stations.clone(),
        badges.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        users.clone(),
        badges.clone(),
        stations.clone(),
        reservations.clone(),
        OperatorDomains::new(app_cfg.security.operator_domains.clone()),
    ));
    let reservation_service = Arc::new(ReservationService::new(
        reservations,
        campaigns,
        stations,
    ));

    // ── REST API ───────────────────────────────────────────────
    let router = create_api_router(
        station_service,
        campaign_service,
        user_service,
        reservation_service,
        jwt_config,
    );

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("SmartCharge backend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
