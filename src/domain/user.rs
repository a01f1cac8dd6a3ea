//! User domain entity

use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// EV driver earning coins and XP
    Driver,
    /// Station operator managing stations and campaigns
    Operator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "DRIVER",
            Self::Operator => "OPERATOR",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "OPERATOR" => Self::Operator,
            _ => Self::Driver,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform user with cumulative gamification counters.
///
/// `coins`, `co2_saved` and `xp` only ever grow, and only through the
/// reservation settlement transaction.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub role: UserRole,
    pub coins: i32,
    pub co2_saved: f64,
    pub xp: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        assert_eq!(UserRole::from_str("OPERATOR"), UserRole::Operator);
        assert_eq!(UserRole::from_str("DRIVER"), UserRole::Driver);
    }

    #[test]
    fn unknown_role_defaults_to_driver() {
        assert_eq!(UserRole::from_str("ADMIN"), UserRole::Driver);
    }
}
