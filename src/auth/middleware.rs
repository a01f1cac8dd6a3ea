//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{verify_token, Claims, JwtConfig};
use crate::domain::user::UserRole;

/// Authentication state shared with the middleware layers
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated user extracted from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    fn from_claims(claims: &Claims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            email: claims.email.clone(),
            role: claims.user_role(),
        })
    }

    pub fn is_operator(&self) -> bool {
        self.role == UserRole::Operator
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware, requires a valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(StatusCode::UNAUTHORIZED, "Missing authentication token");
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(StatusCode::UNAUTHORIZED, "Invalid authentication token");
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(StatusCode::UNAUTHORIZED, "Token has expired");
            }
            let Some(user) = AuthenticatedUser::from_claims(&claims) else {
                return auth_error_response(StatusCode::UNAUTHORIZED, "Invalid authentication token");
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(StatusCode::UNAUTHORIZED, "Invalid authentication token"),
    }
}

/// Operator-only middleware, must be layered after `auth_middleware`
pub async fn operator_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_operator() => next.run(request).await,
        Some(_) => auth_error_response(StatusCode::FORBIDDEN, "Operator role required"),
        None => auth_error_response(StatusCode::UNAUTHORIZED, "Missing authentication token"),
    }
}

fn auth_error_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("abc.def.ghi"), None);
        assert_eq!(extract_token("Basic abc"), None);
    }
}
