//! User profile, leaderboard and badge catalog handlers

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::user::{BadgeDto, UserDto, UserProfileDto};
use crate::api::dto::{ApiResponse, ApiResult};
use crate::api::AppState;
use crate::auth::AuthenticatedUser;
use crate::domain::DomainError;

/// Profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Leaderboard query
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// Number of entries, clamped to 100. Default: 10
    #[serde(default = "default_leaderboard_limit")]
    pub limit: u64,
}

fn default_leaderboard_limit() -> u64 {
    10
}

/// The calling user's profile with badges, stations and recent
/// reservations
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfileDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<UserProfileDto> {
    let profile = state.users.profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

/// Update the calling user's name and email
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<UserDto> {
    request
        .validate()
        .map_err(|e| DomainError::validation(e.to_string()))?;

    let updated = state
        .users
        .update_profile(user.user_id, &request.name, &request.email)
        .await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

/// Top users by XP
#[utoipa::path(
    get,
    path = "/api/users/leaderboard",
    tag = "Users",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Leaderboard", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Vec<UserDto>> {
    let users = state.users.leaderboard(query.limit).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(Into::into).collect(),
    )))
}

/// Badge catalog, name ascending
#[utoipa::path(
    get,
    path = "/api/badges",
    tag = "Users",
    responses(
        (status = 200, description = "Badges", body = ApiResponse<Vec<BadgeDto>>)
    )
)]
pub async fn list_badges(State(state): State<AppState>) -> ApiResult<Vec<BadgeDto>> {
    let badges = state.users.list_badges().await?;
    Ok(Json(ApiResponse::success(
        badges.into_iter().map(Into::into).collect(),
    )))
}
