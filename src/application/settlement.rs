//! Reservation lifecycle and settlement
//!
//! Governs the reservation state machine (PENDING/CONFIRMED → CANCELLED |
//! COMPLETED) and the settlement transaction that credits coins, CO2 and
//! XP exactly once per reservation. The coin amount is captured when the
//! reservation is created and never recomputed afterwards.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::domain::campaign::select_active;
use crate::domain::reservation::{base_coins, NewReservation, Reservation, ReservationStatus};
use crate::domain::user::User;
use crate::domain::{
    CampaignRepository, DomainError, DomainResult, ReservationRepository, StationRepository,
    SETTLEMENT_XP,
};

/// Post-settlement snapshot returned to the caller.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub reservation: Reservation,
    pub user: User,
}

/// Validated input for creating a reservation.
#[derive(Debug, Clone)]
pub struct CreateReservationInput {
    pub station_id: i32,
    /// RFC-3339 timestamp or plain `YYYY-MM-DD` calendar date
    pub date: String,
    pub hour: String,
    pub is_green: bool,
}

/// Parse a reservation date: RFC-3339 first, plain calendar date as
/// fallback (interpreted as midnight UTC).
pub fn parse_reservation_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(midnight.and_utc());
    }
    Err(DomainError::validation("Invalid date format"))
}

/// Service driving reservation creation, status updates and settlement.
pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    stations: Arc<dyn StationRepository>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        stations: Arc<dyn StationRepository>,
    ) -> Self {
        Self { reservations, campaigns, stations }
    }

    /// Create a reservation, capturing the authoritative coin reward.
    ///
    /// The active campaign (station-specific over global, most recent
    /// first) contributes its coin bonus now; later campaign changes never
    /// affect this reservation. A failing campaign lookup degrades to
    /// "no campaign" rather than an error.
    pub async fn create(
        &self,
        user_id: i32,
        input: CreateReservationInput,
    ) -> DomainResult<Reservation> {
        let date = parse_reservation_date(&input.date)?;

        self.stations
            .find_by_id(input.station_id)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        let candidates = self.campaigns.find_active().await.unwrap_or_default();
        let campaign = select_active(&candidates, input.station_id, Utc::now());

        let mut earned_coins = base_coins(input.is_green);
        if let Some(c) = campaign {
            if c.coin_reward > 0 {
                earned_coins += c.coin_reward;
            }
        }

        let reservation = self
            .reservations
            .insert(NewReservation {
                user_id,
                station_id: input.station_id,
                date,
                hour: input.hour,
                is_green: input.is_green,
                earned_coins,
            })
            .await?;

        info!(
            reservation_id = reservation.id,
            user_id,
            earned_coins,
            is_green = input.is_green,
            "reservation created"
        );
        Ok(reservation)
    }

    pub async fn find(&self, id: i32) -> DomainResult<Option<Reservation>> {
        self.reservations.find_by_id(id).await
    }

    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> DomainResult<Vec<Reservation>> {
        self.reservations.find_recent_for_user(user_id, limit).await
    }

    /// Apply a requested status. Completed reservations are immutable;
    /// beyond that guard the transition graph is deliberately permissive.
    pub async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        let existing = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Reservation"))?;
        existing.ensure_mutable()?;

        self.reservations.update_status(id, status).await
    }

    /// Settle a reservation: atomically mark it COMPLETED and credit the
    /// owning user's counters from the values the server stored at
    /// creation. Idempotent in effect; a second call observes
    /// `AlreadyCompleted` and changes nothing.
    pub async fn complete(&self, id: i32) -> DomainResult<SettlementOutcome> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Reservation"))?;
        reservation.ensure_mutable()?;

        // The repository re-checks the status inside the transaction, so a
        // concurrent settle that won the race surfaces as AlreadyCompleted
        // here instead of double-crediting.
        let (reservation, user) = self
            .reservations
            .complete(id, reservation.co2_delta(), SETTLEMENT_XP)
            .await?;

        info!(
            reservation_id = reservation.id,
            user_id = user.id,
            coins = reservation.earned_coins,
            co2 = reservation.saved_co2,
            "reservation settled"
        );
        Ok(SettlementOutcome { reservation, user })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::campaign::{CampaignStatus, NewCampaign};
    use crate::domain::station::{DensityProfile, NewStation};
    use crate::domain::user::{NewUser, UserRole};
    use crate::domain::{CO2_GREEN, UserRepository};
    use crate::infrastructure::memory::InMemoryStore;

    fn store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::new())
    }

    fn service(store: &Arc<InMemoryStore>) -> ReservationService {
        ReservationService::new(store.clone(), store.clone(), store.clone())
    }

    async fn seed_user(store: &Arc<InMemoryStore>) -> i32 {
        UserRepository::insert(
            store.as_ref(),
            NewUser {
                name: "Driver".to_string(),
                email: "driver@test.com".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Driver,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_station(store: &Arc<InMemoryStore>) -> i32 {
        StationRepository::insert(
            store.as_ref(),
            NewStation {
                name: "Station".to_string(),
                lat: 38.6,
                lng: 27.4,
                address: None,
                price: 7.5,
                density: 40,
                density_profile: DensityProfile::Central,
                owner_id: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_campaign(store: &Arc<InMemoryStore>, station_id: Option<i32>, coins: i32) -> i32 {
        CampaignRepository::insert(
            store.as_ref(),
            NewCampaign {
                title: "Promo".to_string(),
                description: String::new(),
                status: CampaignStatus::Active,
                target: String::new(),
                discount: "%20".to_string(),
                end_date: None,
                owner_id: 1,
                station_id,
                coin_reward: coins,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn green_input(station_id: i32) -> CreateReservationInput {
        CreateReservationInput {
            station_id,
            date: "2026-03-01".to_string(),
            hour: "23:00".to_string(),
            is_green: true,
        }
    }

    #[test]
    fn date_parsing_accepts_both_formats() {
        assert!(parse_reservation_date("2026-03-01T23:00:00Z").is_ok());
        assert!(parse_reservation_date("2026-03-01").is_ok());
        assert!(matches!(
            parse_reservation_date("March 1st"),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn green_reservation_without_campaign_earns_50() {
        let store = store();
        let user = seed_user(&store).await;
        let station = seed_station(&store).await;

        let r = service(&store).create(user, green_input(station)).await.unwrap();
        assert_eq!(r.earned_coins, 50);
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.saved_co2, 0.0);
    }

    #[tokio::test]
    async fn regular_reservation_earns_10() {
        let store = store();
        let user = seed_user(&store).await;
        let station = seed_station(&store).await;

        let mut input = green_input(station);
        input.is_green = false;
        let r = service(&store).create(user, input).await.unwrap();
        assert_eq!(r.earned_coins, 10);
    }

    #[tokio::test]
    async fn campaign_bonus_is_captured_at_creation() {
        let store = store();
        let user = seed_user(&store).await;
        let station = seed_station(&store).await;
        seed_campaign(&store, Some(station), 100).await;

        let r = service(&store).create(user, green_input(station)).await.unwrap();
        assert_eq!(r.earned_coins, 150);
    }

    #[tokio::test]
    async fn missing_station_is_not_found() {
        let store = store();
        let user = seed_user(&store).await;

        let err = service(&store).create(user, green_input(404)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station" }));
    }

    #[tokio::test]
    async fn settlement_credits_exactly_once() {
        let store = store();
        let user_id = seed_user(&store).await;
        let station = seed_station(&store).await;
        let svc = service(&store);

        let r = svc.create(user_id, green_input(station)).await.unwrap();
        let outcome = svc.complete(r.id).await.unwrap();

        assert_eq!(outcome.reservation.status, ReservationStatus::Completed);
        assert_eq!(outcome.reservation.saved_co2, CO2_GREEN);
        assert_eq!(outcome.user.coins, 50);
        assert_eq!(outcome.user.co2_saved, CO2_GREEN);
        assert_eq!(outcome.user.xp, 100);

        // Second settlement attempt fails and moves nothing.
        let err = svc.complete(r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted));

        let user = UserRepository::find_by_id(store.as_ref(), user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.coins, 50);
        assert_eq!(user.xp, 100);
    }

    #[tokio::test]
    async fn settlement_uses_creation_time_coins_despite_campaign_changes() {
        let store = store();
        let user_id = seed_user(&store).await;
        let station = seed_station(&store).await;
        let svc = service(&store);

        let campaign_id = seed_campaign(&store, None, 75).await;
        let r = svc.create(user_id, green_input(station)).await.unwrap();
        assert_eq!(r.earned_coins, 125);

        // The campaign disappears between creation and settlement.
        CampaignRepository::delete(store.as_ref(), campaign_id).await.unwrap();

        let outcome = svc.complete(r.id).await.unwrap();
        assert_eq!(outcome.user.coins, 125);
        assert_eq!(outcome.reservation.earned_coins, 125);
    }

    #[tokio::test]
    async fn completed_reservation_rejects_status_updates() {
        let store = store();
        let user = seed_user(&store).await;
        let station = seed_station(&store).await;
        let svc = service(&store);

        let r = svc.create(user, green_input(station)).await.unwrap();
        svc.complete(r.id).await.unwrap();

        let err = svc
            .update_status(r.id, ReservationStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted));
    }

    #[tokio::test]
    async fn cancel_then_complete_is_permitted() {
        // The state machine only guards COMPLETED; a cancelled reservation
        // can still be settled.
        let store = store();
        let user = seed_user(&store).await;
        let station = seed_station(&store).await;
        let svc = service(&store);

        let r = svc.create(user, green_input(station)).await.unwrap();
        let cancelled = svc
            .update_status(r.id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        assert!(svc.complete(r.id).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_settlement_credits_once() {
        let store = store();
        let user_id = seed_user(&store).await;
        let station = seed_station(&store).await;
        let svc = Arc::new(service(&store));

        let r = svc.create(user_id, green_input(station)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = svc.clone();
            let id = r.id;
            handles.push(tokio::spawn(async move { svc.complete(id).await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);

        let user = UserRepository::find_by_id(store.as_ref(), user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.coins, 50);
        assert_eq!(user.xp, 100);
    }
}
