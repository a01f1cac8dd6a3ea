//! Reservation domain entity and settlement constants

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Coins earned for a reservation outside the green window
pub const BASE_COINS: i32 = 10;
/// Coins earned for a reservation inside the green window
pub const GREEN_COINS: i32 = 50;
/// XP credited on every settlement
pub const SETTLEMENT_XP: i32 = 100;
/// Kilograms of CO2 saved by a green-hour charge
pub const CO2_GREEN: f64 = 2.5;
/// Kilograms of CO2 saved by a regular charge
pub const CO2_STANDARD: f64 = 0.5;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Read a stored status tag. Unknown tags map to PENDING rather than
    /// failing a read path; the API layer uses the strict `parse`.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Pending)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Charging slot reservation.
///
/// `earned_coins` is captured once at creation time and stays frozen for
/// the reservation's entire lifetime; settlement credits exactly this
/// value, never a recomputed or caller-supplied one.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub station_id: i32,
    pub date: DateTime<Utc>,
    /// Display label of the booked hour, e.g. "23:00"
    pub hour: String,
    /// Whether the slot falls in the discounted green window
    pub is_green: bool,
    pub earned_coins: i32,
    /// Populated at settlement, zero until then
    pub saved_co2: f64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Guard applied before any status mutation: COMPLETED is terminal.
    pub fn ensure_mutable(&self) -> DomainResult<()> {
        if self.status == ReservationStatus::Completed {
            return Err(DomainError::AlreadyCompleted);
        }
        Ok(())
    }

    /// CO2 delta credited when this reservation settles.
    pub fn co2_delta(&self) -> f64 {
        if self.is_green {
            CO2_GREEN
        } else {
            CO2_STANDARD
        }
    }
}

/// Base coin reward for a slot, before any campaign bonus.
pub fn base_coins(is_green: bool) -> i32 {
    if is_green {
        GREEN_COINS
    } else {
        BASE_COINS
    }
}

/// Fields for creating a new reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: i32,
    pub station_id: i32,
    pub date: DateTime<Utc>,
    pub hour: String,
    pub is_green: bool,
    pub earned_coins: i32,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ReservationStatus, is_green: bool) -> Reservation {
        Reservation {
            id: 1,
            user_id: 1,
            station_id: 1,
            date: Utc::now(),
            hour: "23:00".to_string(),
            is_green,
            earned_coins: base_coins(is_green),
            saved_co2: 0.0,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn completed_is_immutable() {
        let r = sample(ReservationStatus::Completed, true);
        assert!(matches!(
            r.ensure_mutable(),
            Err(DomainError::AlreadyCompleted)
        ));
    }

    #[test]
    fn pending_and_cancelled_pass_the_guard() {
        assert!(sample(ReservationStatus::Pending, false).ensure_mutable().is_ok());
        assert!(sample(ReservationStatus::Cancelled, false).ensure_mutable().is_ok());
    }

    #[test]
    fn co2_delta_depends_on_green_flag() {
        assert_eq!(sample(ReservationStatus::Pending, true).co2_delta(), CO2_GREEN);
        assert_eq!(sample(ReservationStatus::Pending, false).co2_delta(), CO2_STANDARD);
    }

    #[test]
    fn base_coins_for_green_and_regular() {
        assert_eq!(base_coins(true), 50);
        assert_eq!(base_coins(false), 10);
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(ReservationStatus::parse("COMPLETED"), Some(ReservationStatus::Completed));
        assert_eq!(ReservationStatus::parse("DONE"), None);
    }
}
