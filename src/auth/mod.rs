//! Authentication: JWT issuing and verification, password hashing and the
//! Axum middleware layers

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use middleware::{auth_middleware, operator_middleware, AuthState, AuthenticatedUser};
