//! Operator API handlers: station CRUD, dashboard and forecast refresh

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::station::{OperatorDashboardDto, StationDto};
use crate::api::dto::{ApiError, ApiResponse, ApiResult};
use crate::api::AppState;
use crate::application::stations::{CreateStationInput, UpdateStationInput};
use crate::auth::AuthenticatedUser;
use crate::domain::DomainError;

/// Station creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    pub address: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Partial station update request
#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub price: Option<f64>,
}

/// Forecast refresh request
#[derive(Debug, Deserialize, ToSchema, Default)]
pub struct RefreshForecastsRequest {
    /// Base RNG seed; omit for a time-derived seed
    pub seed: Option<u64>,
}

/// Forecast refresh result
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshForecastsResponse {
    pub forecasts_written: usize,
}

/// Operator dashboard: owned stations with reservation stats and revenue
#[utoipa::path(
    get,
    path = "/api/operator/stations",
    tag = "Operator",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = ApiResponse<OperatorDashboardDto>),
        (status = 403, description = "Operator role required")
    )
)]
pub async fn my_stations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<OperatorDashboardDto> {
    let dashboard = state.stations.my_stations(user.user_id).await?;
    Ok(Json(ApiResponse::success(dashboard.into())))
}

/// Create a station owned by the calling operator
#[utoipa::path(
    post,
    path = "/api/operator/stations",
    tag = "Operator",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_station(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), ApiError> {
    request
        .validate()
        .map_err(|e| DomainError::validation(e.to_string()))?;

    let station = state
        .stations
        .create(
            user.user_id,
            CreateStationInput {
                name: request.name,
                lat: request.lat,
                lng: request.lng,
                address: request.address,
                price: request.price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(station.into()))))
}

/// Update a station
#[utoipa::path(
    put,
    path = "/api/operator/stations/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station id")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 403, description = "Not the station owner"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn update_station(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStationRequest>,
) -> ApiResult<StationDto> {
    ensure_owner(&state, &user, id).await?;

    let station = state
        .stations
        .update(
            id,
            UpdateStationInput {
                name: request.name,
                lat: request.lat,
                lng: request.lng,
                address: request.address,
                price: request.price,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(station.into())))
}

/// Delete a station. Stations with reservations are never deleted.
#[utoipa::path(
    delete,
    path = "/api/operator/stations/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station deleted"),
        (status = 403, description = "Not the station owner"),
        (status = 404, description = "Station not found"),
        (status = 409, description = "Station has linked reservations")
    )
)]
pub async fn delete_station(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    ensure_owner(&state, &user, id).await?;
    state.stations.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Rebuild every station's weekly forecast
#[utoipa::path(
    post,
    path = "/api/operator/forecasts/refresh",
    tag = "Operator",
    security(("bearer_auth" = [])),
    request_body = RefreshForecastsRequest,
    responses(
        (status = 200, description = "Refresh done", body = ApiResponse<RefreshForecastsResponse>),
        (status = 403, description = "Operator role required")
    )
)]
pub async fn refresh_forecasts(
    State(state): State<AppState>,
    Json(request): Json<RefreshForecastsRequest>,
) -> ApiResult<RefreshForecastsResponse> {
    let seed = request
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp() as u64);
    let forecasts_written = state.stations.refresh_forecasts(seed).await?;
    Ok(Json(ApiResponse::success(RefreshForecastsResponse {
        forecasts_written,
    })))
}

async fn ensure_owner(
    state: &AppState,
    user: &AuthenticatedUser,
    station_id: i32,
) -> Result<(), ApiError> {
    state
        .stations
        .find_owned(station_id, user.user_id)
        .await?;
    Ok(())
}
