//! User and badge API DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::users::UserProfile;
use crate::domain::badge::Badge;
use crate::domain::user::User;

use super::reservation::ReservationDto;
use super::station::StationDto;

/// User as exposed by the API, without credentials
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// DRIVER or OPERATOR
    pub role: String,
    pub coins: i32,
    pub co2_saved: f64,
    pub xp: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.as_str().to_string(),
            coins: u.coins,
            co2_saved: u.co2_saved,
            xp: u.xp,
            created_at: u.created_at,
        }
    }
}

/// Achievement badge
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl From<Badge> for BadgeDto {
    fn from(b: Badge) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            icon: b.icon,
        }
    }
}

/// Full profile: the user plus badges, owned stations and recent
/// reservations
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub badges: Vec<BadgeDto>,
    pub stations: Vec<StationDto>,
    pub reservations: Vec<ReservationDto>,
}

impl From<UserProfile> for UserProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            user: p.user.into(),
            badges: p.badges.into_iter().map(Into::into).collect(),
            stations: p.stations.into_iter().map(Into::into).collect(),
            reservations: p.reservations.into_iter().map(Into::into).collect(),
        }
    }
}
