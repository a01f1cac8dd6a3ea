//! Repository trait definitions
//!
//! The application layer talks to persistence exclusively through these
//! traits. SeaORM implementations live in `infrastructure::database`, an
//! in-memory implementation for development and tests in
//! `infrastructure::memory`.

use async_trait::async_trait;

use crate::domain::badge::{Badge, NewBadge};
use crate::domain::campaign::{Campaign, NewCampaign};
use crate::domain::forecast::ForecastEntry;
use crate::domain::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::domain::station::{NewStation, Station};
use crate::domain::user::{NewUser, User};
use crate::domain::DomainResult;

/// Reservation aggregates for one station, used by the operator dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationStats {
    pub total: i64,
    pub green: i64,
    pub completed: i64,
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn insert(&self, station: NewStation) -> DomainResult<Station>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;
    async fn find_all(&self) -> DomainResult<Vec<Station>>;
    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Station>>;
    async fn update(&self, station: Station) -> DomainResult<Station>;
    /// Overwrite the cached density snapshot (forecast refresh path)
    async fn update_density(&self, id: i32, density: i32) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; duplicate email is a Conflict
    async fn insert(&self, user: NewUser) -> DomainResult<User>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn update_profile(&self, id: i32, name: String, email: String) -> DomainResult<User>;
    /// Top users by XP, descending
    async fn leaderboard(&self, limit: u64) -> DomainResult<Vec<User>>;
}

#[async_trait]
pub trait BadgeRepository: Send + Sync {
    async fn insert(&self, badge: NewBadge) -> DomainResult<Badge>;
    /// All badges, name ascending
    async fn find_all(&self) -> DomainResult<Vec<Badge>>;
    async fn find_for_user(&self, user_id: i32) -> DomainResult<Vec<Badge>>;
    async fn add_user_badge(&self, user_id: i32, badge_id: i32) -> DomainResult<()>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn insert(&self, campaign: NewCampaign) -> DomainResult<Campaign>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Campaign>>;
    /// Campaigns owned by an operator, newest first
    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Campaign>>;
    /// All campaigns with ACTIVE status. Expiry and station scoping are
    /// applied by the selection policy, not here.
    async fn find_active(&self) -> DomainResult<Vec<Campaign>>;
    async fn update(&self, campaign: Campaign) -> DomainResult<Campaign>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn target_badges(&self, campaign_id: i32) -> DomainResult<Vec<Badge>>;
    /// Replace the target badge links of a campaign
    async fn set_target_badges(&self, campaign_id: i32, badge_ids: &[i32]) -> DomainResult<()>;
}

#[async_trait]
pub trait ForecastRepository: Send + Sync {
    /// Bulk upsert, last writer wins per (station, day_of_week, hour)
    async fn upsert_many(&self, entries: &[ForecastEntry]) -> DomainResult<()>;
    async fn find_for_station_day(
        &self,
        station_id: i32,
        day_of_week: u8,
    ) -> DomainResult<Vec<ForecastEntry>>;
    /// All stations' predictions at one weekly slot (map view)
    async fn find_by_day_hour(&self, day_of_week: u8, hour: u8) -> DomainResult<Vec<ForecastEntry>>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;
    /// Most recent reservations of a user, newest first
    async fn find_recent_for_user(&self, user_id: i32, limit: u64)
        -> DomainResult<Vec<Reservation>>;
    async fn update_status(&self, id: i32, status: ReservationStatus)
        -> DomainResult<Reservation>;

    /// Settle a reservation: mark it COMPLETED, write `saved_co2` and credit
    /// the owning user's coins, CO2 and XP counters in one atomic unit.
    ///
    /// The already-completed check runs inside the same transaction as both
    /// writes, so of two concurrent callers at most one succeeds; the other
    /// gets `DomainError::AlreadyCompleted` and no counters move twice.
    /// Rolls back in full on any partial failure.
    async fn complete(
        &self,
        id: i32,
        co2_delta: f64,
        xp_delta: i32,
    ) -> DomainResult<(Reservation, User)>;

    async fn station_stats(&self, station_id: i32) -> DomainResult<ReservationStats>;
    /// Whether any reservation still references the station (delete guard)
    async fn exists_for_station(&self, station_id: i32) -> DomainResult<bool>;
}
