//! Campaign API handlers: driver feed and operator management

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::campaign::{CampaignForUserDto, CampaignWithBadgesDto};
use crate::api::dto::{ApiError, ApiResponse, ApiResult};
use crate::api::AppState;
use crate::application::campaigns::{CreateCampaignInput, UpdateCampaignInput};
use crate::auth::AuthenticatedUser;
use crate::domain::DomainError;

/// Campaign creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub discount: String,
    /// RFC 3339 or YYYY-MM-DD; omit for no expiry
    pub end_date: Option<String>,
    /// Omit to apply to every station
    pub station_id: Option<i32>,
    #[serde(default)]
    pub coin_reward: i32,
    #[serde(default)]
    pub target_badge_ids: Vec<i32>,
}

/// Partial campaign update request
#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub target: Option<String>,
    pub discount: Option<String>,
    pub end_date: Option<String>,
    pub station_id: Option<i32>,
    pub coin_reward: Option<i32>,
    pub target_badge_ids: Option<Vec<i32>>,
}

/// Active campaigns for the calling driver with matched target badges
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaign feed", body = ApiResponse<Vec<CampaignForUserDto>>)
    )
)]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<CampaignForUserDto>> {
    let feed = state.campaigns.list_for_user(user.user_id, Utc::now()).await?;
    Ok(Json(ApiResponse::success(
        feed.into_iter().map(Into::into).collect(),
    )))
}

/// The calling operator's campaigns, newest first
#[utoipa::path(
    get,
    path = "/api/operator/campaigns",
    tag = "Operator",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaigns", body = ApiResponse<Vec<CampaignWithBadgesDto>>),
        (status = 403, description = "Operator role required")
    )
)]
pub async fn my_campaigns(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<CampaignWithBadgesDto>> {
    let campaigns = state.campaigns.list_by_owner(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        campaigns.into_iter().map(Into::into).collect(),
    )))
}

/// Create a campaign
#[utoipa::path(
    post,
    path = "/api/operator/campaigns",
    tag = "Operator",
    security(("bearer_auth" = [])),
    request_body = CreateCampaignRequest,
    responses(
        (status = 201, description = "Campaign created", body = ApiResponse<CampaignWithBadgesDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Scoped station not found")
    )
)]
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CampaignWithBadgesDto>>), ApiError> {
    request
        .validate()
        .map_err(|e| DomainError::validation(e.to_string()))?;

    let campaign = state
        .campaigns
        .create(
            user.user_id,
            CreateCampaignInput {
                title: request.title,
                description: request.description,
                target: request.target,
                discount: request.discount,
                end_date: request.end_date,
                station_id: request.station_id,
                coin_reward: request.coin_reward,
                target_badge_ids: request.target_badge_ids,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(campaign.into())),
    ))
}

/// Update a campaign owned by the caller
#[utoipa::path(
    put,
    path = "/api/operator/campaigns/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign id")),
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign updated", body = ApiResponse<CampaignWithBadgesDto>),
        (status = 403, description = "Not the campaign owner"),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCampaignRequest>,
) -> ApiResult<CampaignWithBadgesDto> {
    let campaign = state
        .campaigns
        .update(
            id,
            user.user_id,
            UpdateCampaignInput {
                title: request.title,
                description: request.description,
                status: request.status,
                target: request.target,
                discount: request.discount,
                end_date: request.end_date,
                station_id: request.station_id.map(Some),
                coin_reward: request.coin_reward,
                target_badge_ids: request.target_badge_ids,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(campaign.into())))
}

/// Delete a campaign owned by the caller
#[utoipa::path(
    delete,
    path = "/api/operator/campaigns/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Campaign deleted"),
        (status = 403, description = "Not the campaign owner"),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.campaigns.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(())))
}
