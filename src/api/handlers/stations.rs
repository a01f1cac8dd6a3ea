//! Public station API handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::dto::station::{StationDetailDto, StationForecastDto, StationListItemDto};
use crate::api::dto::{ApiResponse, ApiResult};
use crate::api::AppState;

/// Weekly slot selector for the forecast map
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u8,
    /// 0-23
    pub hour: u8,
}

/// All stations with their load status
#[utoipa::path(
    get,
    path = "/api/stations",
    tag = "Stations",
    responses(
        (status = 200, description = "Station list", body = ApiResponse<Vec<StationListItemDto>>)
    )
)]
pub async fn list_stations(State(state): State<AppState>) -> ApiResult<Vec<StationListItemDto>> {
    let items = state.stations.list().await?;
    Ok(Json(ApiResponse::success(
        items.into_iter().map(Into::into).collect(),
    )))
}

/// Station detail with the current day's 24 priced slots
#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station detail", body = ApiResponse<StationDetailDto>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StationDetailDto> {
    let detail = state.stations.get(id, Utc::now()).await?;
    Ok(Json(ApiResponse::success(detail.into())))
}

/// Every station's predicted load at one weekly slot
#[utoipa::path(
    get,
    path = "/api/stations/forecasts",
    tag = "Stations",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Predicted loads", body = ApiResponse<Vec<StationForecastDto>>),
        (status = 400, description = "Slot out of range")
    )
)]
pub async fn station_forecasts(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Vec<StationForecastDto>> {
    let items = state
        .stations
        .forecasts_at(query.day_of_week, query.hour)
        .await?;
    Ok(Json(ApiResponse::success(
        items.into_iter().map(Into::into).collect(),
    )))
}
