//! Reservation API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::reservation::ReservationDto;
use crate::api::dto::user::UserDto;
use crate::api::dto::{ApiError, ApiResponse, ApiResult};
use crate::api::AppState;
use crate::application::settlement::CreateReservationInput;
use crate::auth::AuthenticatedUser;
use crate::domain::reservation::ReservationStatus;
use crate::domain::DomainError;

/// Reservation creation request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "stationId": 1,
    "date": "2026-01-12",
    "hour": "23:00",
    "isGreen": true
}))]
pub struct CreateReservationRequest {
    pub station_id: i32,
    /// RFC 3339 timestamp or plain YYYY-MM-DD
    pub date: String,
    /// Slot label, "HH:00"
    pub hour: String,
    #[serde(default)]
    pub is_green: bool,
}

/// Status transition request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, CONFIRMED, CANCELLED or COMPLETED
    pub status: String,
}

/// Settlement result: the completed reservation plus the credited user
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDto {
    pub reservation: ReservationDto,
    pub user: UserDto,
}

/// Create a reservation.
///
/// The coin reward is computed server side from the green flag and the
/// active campaign, and frozen on the reservation.
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .reservations
        .create(
            user.user_id,
            CreateReservationInput {
                station_id: request.station_id,
                date: request.date,
                hour: request.hour,
                is_green: request.is_green,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

/// The calling user's recent reservations, newest first
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent reservations", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn my_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.reservations.recent_for_user(user.user_id, 20).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}

/// Transition a reservation's status.
///
/// COMPLETED is not accepted here; settlement goes through the complete
/// endpoint so the gamification counters are credited atomically.
#[utoipa::path(
    put,
    path = "/api/reservations/{id}/status",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation already completed")
    )
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<ReservationDto> {
    let status = ReservationStatus::parse(&request.status)
        .ok_or_else(|| DomainError::validation("Unknown reservation status"))?;
    if status == ReservationStatus::Completed {
        return Err(DomainError::validation(
            "Use the complete endpoint to settle a reservation",
        )
        .into());
    }
    ensure_own_reservation(&state, &user, id).await?;

    let reservation = state.reservations.update_status(id, status).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// Settle a reservation.
///
/// Marks it COMPLETED and credits the user's coins, CO2 and XP in one
/// atomic transaction. Settling twice is a conflict.
#[utoipa::path(
    post,
    path = "/api/reservations/{id}/complete",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Settled", body = ApiResponse<SettlementDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation already completed")
    )
)]
pub async fn complete_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<SettlementDto> {
    ensure_own_reservation(&state, &user, id).await?;

    let outcome = state.reservations.complete(id).await?;
    Ok(Json(ApiResponse::success(SettlementDto {
        reservation: outcome.reservation.into(),
        user: outcome.user.into(),
    })))
}

async fn ensure_own_reservation(
    state: &AppState,
    user: &AuthenticatedUser,
    id: i32,
) -> Result<(), ApiError> {
    let reservation = state
        .reservations
        .find(id)
        .await?
        .ok_or(DomainError::not_found("Reservation"))?;
    if reservation.user_id != user.user_id {
        return Err(DomainError::Forbidden.into());
    }
    Ok(())
}
