//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::campaign::{CampaignDto, CampaignForUserDto, CampaignWithBadgesDto};
use crate::api::dto::reservation::ReservationDto;
use crate::api::dto::station::{
    AggregateStatsDto, CampaignSummaryDto, OperatorDashboardDto, SlotDto, StationDetailDto,
    StationDto, StationForecastDto, StationListItemDto, StationSummaryDto,
};
use crate::api::dto::user::{BadgeDto, UserDto, UserProfileDto};
use crate::api::dto::ApiResponse;
use crate::api::handlers::{auth, campaigns, health, operator, reservations, stations, users};
use crate::api::AppState;
use crate::application::{CampaignService, ReservationService, StationService, UserService};
use crate::auth::middleware::{auth_middleware, operator_middleware, AuthState};
use crate::auth::JwtConfig;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::station_forecasts,
        // Reservations
        reservations::create_reservation,
        reservations::my_reservations,
        reservations::update_reservation_status,
        reservations::complete_reservation,
        // Campaigns
        campaigns::list_campaigns,
        campaigns::my_campaigns,
        campaigns::create_campaign,
        campaigns::update_campaign,
        campaigns::delete_campaign,
        // Users
        users::get_profile,
        users::update_profile,
        users::leaderboard,
        users::list_badges,
        // Operator
        operator::my_stations,
        operator::create_station,
        operator::update_station,
        operator::delete_station,
        operator::refresh_forecasts,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthStatus,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            // Stations
            StationDto,
            StationListItemDto,
            StationDetailDto,
            StationForecastDto,
            SlotDto,
            CampaignSummaryDto,
            // Operator
            OperatorDashboardDto,
            StationSummaryDto,
            AggregateStatsDto,
            operator::CreateStationRequest,
            operator::UpdateStationRequest,
            operator::RefreshForecastsRequest,
            operator::RefreshForecastsResponse,
            // Reservations
            ReservationDto,
            reservations::CreateReservationRequest,
            reservations::UpdateStatusRequest,
            reservations::SettlementDto,
            // Campaigns
            CampaignDto,
            CampaignWithBadgesDto,
            CampaignForUserDto,
            campaigns::CreateCampaignRequest,
            campaigns::UpdateCampaignRequest,
            // Users
            UserDto,
            UserProfileDto,
            BadgeDto,
            users::UpdateProfileRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check."),
        (name = "Authentication", description = "Account registration and JWT login. Pass the token in the `Authorization: Bearer <token>` header."),
        (name = "Stations", description = "Public station map: list with load status, detail with 24 priced hourly slots, weekly load forecasts."),
        (name = "Reservations", description = "Slot reservations and settlement. Settling a reservation credits coins, CO2 and XP atomically; a reservation settles at most once."),
        (name = "Campaigns", description = "Promotional campaigns. Drivers see the active feed with matched target badges; operators manage their own campaigns."),
        (name = "Users", description = "Profiles, the badge catalog and the XP leaderboard."),
        (name = "Operator", description = "Operator-only management: owned stations with dashboard stats, station CRUD and forecast refresh."),
    ),
    info(
        title = "SmartCharge API",
        version = "1.0.0",
        description = "REST API for the SmartCharge EV charging gamification platform.

## Response format

Every response is wrapped in the standard envelope:
```json
{\"success\": true, \"data\": {...}}
```

On error:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Authentication

Get a token via `POST /api/auth/login` and pass it in the
`Authorization: Bearer <token>` header. Accounts registered with an
allowlisted operator email domain get the OPERATOR role.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    station_service: Arc<StationService>,
    campaign_service: Arc<CampaignService>,
    user_service: Arc<UserService>,
    reservation_service: Arc<ReservationService>,
    jwt_config: JwtConfig,
) -> Router {
    let state = AppState {
        stations: station_service,
        campaigns: campaign_service,
        users: user_service,
        reservations: reservation_service,
        jwt_config: jwt_config.clone(),
    };
    let middleware_state = AuthState { jwt_config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/stations", get(stations::list_stations))
        .route("/api/stations/forecasts", get(stations::station_forecasts))
        .route("/api/stations/{id}", get(stations::get_station))
        .route("/api/users/leaderboard", get(users::leaderboard))
        .route("/api/badges", get(users::list_badges));

    // Authenticated routes (any role)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/reservations",
            get(reservations::my_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/reservations/{id}/status",
            put(reservations::update_reservation_status),
        )
        .route(
            "/api/reservations/{id}/complete",
            post(reservations::complete_reservation),
        )
        .route("/api/campaigns", get(campaigns::list_campaigns))
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    // Operator-only routes
    let operator_routes = Router::new()
        .route(
            "/api/operator/stations",
            get(operator::my_stations).post(operator::create_station),
        )
        .route(
            "/api/operator/stations/{id}",
            put(operator::update_station).delete(operator::delete_station),
        )
        .route(
            "/api/operator/forecasts/refresh",
            post(operator::refresh_forecasts),
        )
        .route(
            "/api/operator/campaigns",
            get(campaigns::my_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/api/operator/campaigns/{id}",
            put(campaigns::update_campaign).delete(campaigns::delete_campaign),
        )
        .layer(middleware::from_fn(operator_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_routes)
        .merge(protected_routes)
        .merge(operator_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
