//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::user::UserDto;
use crate::api::dto::{ApiError, ApiResponse, ApiResult};
use crate::api::AppState;
use crate::auth::{create_token, AuthenticatedUser};
use crate::domain::DomainError;

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Ayşe Yılmaz",
    "email": "ayse@gmail.com",
    "password": "demo123"
}))]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// At least 6 characters
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "driver@test.com",
    "password": "demo123"
}))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
///
/// The token goes into the `Authorization: Bearer <token>` header of
/// subsequent requests.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserDto,
}

/// Register a new account.
///
/// The role is derived from the email domain: allowlisted operator domains
/// get OPERATOR, everyone else DRIVER.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, returns a token", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    request
        .validate()
        .map_err(|e| DomainError::validation(e.to_string()))?;

    let user = state
        .users
        .register(&request.name, &request.email, &request.password)
        .await?;
    let token = create_token(&user, &state.jwt_config)
        .map_err(|e| DomainError::Internal(format!("Token creation failed: {}", e)))?;

    let response = AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: user.into(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, returns a token", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = state.users.login(&request.email, &request.password).await?;
    let token = create_token(&user, &state.jwt_config)
        .map_err(|e| DomainError::Internal(format!("Token creation failed: {}", e)))?;

    let response = AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: user.into(),
    };
    Ok(Json(ApiResponse::success(response)))
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<UserDto> {
    let profile = state.users.profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(profile.user.into())))
}
