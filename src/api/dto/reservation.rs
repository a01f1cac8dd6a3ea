//! Reservation API DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::reservation::Reservation;

/// Reservation as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i32,
    pub user_id: i32,
    pub station_id: i32,
    pub date: DateTime<Utc>,
    pub hour: String,
    pub is_green: bool,
    pub earned_coins: i32,
    pub saved_co2: f64,
    /// PENDING, CONFIRMED, CANCELLED or COMPLETED
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            station_id: r.station_id,
            date: r.date,
            hour: r.hour,
            is_green: r.is_green,
            earned_coins: r.earned_coins,
            saved_co2: r.saved_co2,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}
