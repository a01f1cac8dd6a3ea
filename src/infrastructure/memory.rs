//! In-memory repository implementations for development and testing
//!
//! Backed by `DashMap`; the settlement path takes a store-wide mutex so
//! the completed-check and the counter updates behave like one
//! transaction, matching the SeaORM implementation's guarantees.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::badge::{Badge, NewBadge};
use crate::domain::campaign::{Campaign, CampaignStatus, NewCampaign};
use crate::domain::forecast::ForecastEntry;
use crate::domain::repositories::ReservationStats;
use crate::domain::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::domain::station::{NewStation, Station};
use crate::domain::user::{NewUser, User};
use crate::domain::{
    BadgeRepository, CampaignRepository, DomainError, DomainResult, ForecastRepository,
    ReservationRepository, StationRepository, UserRepository,
};

/// In-memory store implementing every repository trait.
pub struct InMemoryStore {
    stations: DashMap<i32, Station>,
    users: DashMap<i32, User>,
    badges: DashMap<i32, Badge>,
    user_badges: DashMap<(i32, i32), ()>,
    campaigns: DashMap<i32, Campaign>,
    campaign_badges: DashMap<i32, Vec<i32>>,
    reservations: DashMap<i32, Reservation>,
    forecasts: DashMap<(i32, u8, u8), i32>,
    station_counter: AtomicI32,
    user_counter: AtomicI32,
    badge_counter: AtomicI32,
    campaign_counter: AtomicI32,
    reservation_counter: AtomicI32,
    /// Serializes settlement so the check and both writes are one unit
    settlement_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            stations: DashMap::new(),
            users: DashMap::new(),
            badges: DashMap::new(),
            user_badges: DashMap::new(),
            campaigns: DashMap::new(),
            campaign_badges: DashMap::new(),
            reservations: DashMap::new(),
            forecasts: DashMap::new(),
            station_counter: AtomicI32::new(1),
            user_counter: AtomicI32::new(1),
            badge_counter: AtomicI32::new(1),
            campaign_counter: AtomicI32::new(1),
            reservation_counter: AtomicI32::new(1),
            settlement_lock: Mutex::new(()),
        }
    }

    fn next(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StationRepository for InMemoryStore {
    async fn insert(&self, station: NewStation) -> DomainResult<Station> {
        let id = Self::next(&self.station_counter);
        let station = Station {
            id,
            name: station.name,
            lat: station.lat,
            lng: station.lng,
            address: station.address,
            price: station.price,
            density: station.density,
            density_profile: station.density_profile,
            owner_id: station.owner_id,
            created_at: Utc::now(),
        };
        self.stations.insert(id, station.clone());
        Ok(station)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(&id).map(|s| s.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let mut all: Vec<Station> = self.stations.iter().map(|s| s.clone()).collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Station>> {
        let mut owned: Vec<Station> = self
            .stations
            .iter()
            .filter(|s| s.owner_id == Some(owner_id))
            .map(|s| s.clone())
            .collect();
        owned.sort_by_key(|s| s.id);
        Ok(owned)
    }

    async fn update(&self, station: Station) -> DomainResult<Station> {
        if !self.stations.contains_key(&station.id) {
            return Err(DomainError::not_found("Station"));
        }
        self.stations.insert(station.id, station.clone());
        Ok(station)
    }

    async fn update_density(&self, id: i32, density: i32) -> DomainResult<()> {
        let mut station = self
            .stations
            .get_mut(&id)
            .ok_or(DomainError::not_found("Station"))?;
        station.density = density;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        if self.reservations.iter().any(|r| r.station_id == id) {
            return Err(DomainError::Conflict(
                "Station has linked reservations".to_string(),
            ));
        }
        self.stations
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::not_found("Station"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: NewUser) -> DomainResult<User> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("This email is already in use".to_string()));
        }
        let id = Self::next(&self.user_counter);
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            coins: 0,
            co2_saved: 0.0,
            xp: 0,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn update_profile(&self, id: i32, name: String, email: String) -> DomainResult<User> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::not_found("User"))?;
        user.name = name;
        user.email = email;
        Ok(user.clone())
    }

    async fn leaderboard(&self, limit: u64) -> DomainResult<Vec<User>> {
        let mut all: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        all.sort_by(|a, b| b.xp.cmp(&a.xp));
        all.truncate(limit as usize);
        Ok(all)
    }
}

#[async_trait]
impl BadgeRepository for InMemoryStore {
    async fn insert(&self, badge: NewBadge) -> DomainResult<Badge> {
        let id = Self::next(&self.badge_counter);
        let badge = Badge {
            id,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
        };
        self.badges.insert(id, badge.clone());
        Ok(badge)
    }

    async fn find_all(&self) -> DomainResult<Vec<Badge>> {
        let mut all: Vec<Badge> = self.badges.iter().map(|b| b.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_for_user(&self, user_id: i32) -> DomainResult<Vec<Badge>> {
        let ids: Vec<i32> = self
            .user_badges
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.key().1)
            .collect();
        let mut earned: Vec<Badge> = ids
            .into_iter()
            .filter_map(|id| self.badges.get(&id).map(|b| b.clone()))
            .collect();
        earned.sort_by_key(|b| b.id);
        Ok(earned)
    }

    async fn add_user_badge(&self, user_id: i32, badge_id: i32) -> DomainResult<()> {
        self.user_badges.insert((user_id, badge_id), ());
        Ok(())
    }
}

#[async_trait]
impl CampaignRepository for InMemoryStore {
    async fn insert(&self, campaign: NewCampaign) -> DomainResult<Campaign> {
        let id = Self::next(&self.campaign_counter);
        let now = Utc::now();
        let campaign = Campaign {
            id,
            title: campaign.title,
            description: campaign.description,
            status: campaign.status,
            target: campaign.target,
            discount: campaign.discount,
            end_date: campaign.end_date,
            owner_id: campaign.owner_id,
            station_id: campaign.station_id,
            coin_reward: campaign.coin_reward,
            created_at: now,
            updated_at: now,
        };
        self.campaigns.insert(id, campaign.clone());
        Ok(campaign)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Campaign>> {
        Ok(self.campaigns.get(&id).map(|c| c.clone()))
    }

    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Campaign>> {
        let mut owned: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .map(|c| c.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_active(&self) -> DomainResult<Vec<Campaign>> {
        Ok(self
            .campaigns
            .iter()
            .filter(|c| c.status == CampaignStatus::Active)
            .map(|c| c.clone())
            .collect())
    }

    async fn update(&self, campaign: Campaign) -> DomainResult<Campaign> {
        if !self.campaigns.contains_key(&campaign.id) {
            return Err(DomainError::not_found("Campaign"));
        }
        let mut campaign = campaign;
        campaign.updated_at = Utc::now();
        self.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.campaign_badges.remove(&id);
        self.campaigns
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::not_found("Campaign"))
    }

    async fn target_badges(&self, campaign_id: i32) -> DomainResult<Vec<Badge>> {
        let ids = self
            .campaign_badges
            .get(&campaign_id)
            .map(|v| v.clone())
            .unwrap_or_default();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.badges.get(&id).map(|b| b.clone()))
            .collect())
    }

    async fn set_target_badges(&self, campaign_id: i32, badge_ids: &[i32]) -> DomainResult<()> {
        self.campaign_badges.insert(campaign_id, badge_ids.to_vec());
        Ok(())
    }
}

#[async_trait]
impl ForecastRepository for InMemoryStore {
    async fn upsert_many(&self, entries: &[ForecastEntry]) -> DomainResult<()> {
        for e in entries {
            self.forecasts
                .insert((e.station_id, e.day_of_week, e.hour), e.predicted_load);
        }
        Ok(())
    }

    async fn find_for_station_day(
        &self,
        station_id: i32,
        day_of_week: u8,
    ) -> DomainResult<Vec<ForecastEntry>> {
        let mut entries: Vec<ForecastEntry> = self
            .forecasts
            .iter()
            .filter(|entry| entry.key().0 == station_id && entry.key().1 == day_of_week)
            .map(|entry| ForecastEntry {
                station_id,
                day_of_week,
                hour: entry.key().2,
                predicted_load: *entry.value(),
            })
            .collect();
        entries.sort_by_key(|e| e.hour);
        Ok(entries)
    }

    async fn find_by_day_hour(&self, day_of_week: u8, hour: u8) -> DomainResult<Vec<ForecastEntry>> {
        let mut entries: Vec<ForecastEntry> = self
            .forecasts
            .iter()
            .filter(|entry| entry.key().1 == day_of_week && entry.key().2 == hour)
            .map(|entry| ForecastEntry {
                station_id: entry.key().0,
                day_of_week,
                hour,
                predicted_load: *entry.value(),
            })
            .collect();
        entries.sort_by_key(|e| e.station_id);
        Ok(entries)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        let id = Self::next(&self.reservation_counter);
        let reservation = Reservation {
            id,
            user_id: reservation.user_id,
            station_id: reservation.station_id,
            date: reservation.date,
            hour: reservation.hour,
            is_green: reservation.is_green,
            earned_coins: reservation.earned_coins,
            saved_co2: 0.0,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> DomainResult<Vec<Reservation>> {
        let mut mine: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        mine.truncate(limit as usize);
        Ok(mine)
    }

    async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        let mut reservation = self
            .reservations
            .get_mut(&id)
            .ok_or(DomainError::not_found("Reservation"))?;
        reservation.status = status;
        Ok(reservation.clone())
    }

    async fn complete(
        &self,
        id: i32,
        co2_delta: f64,
        xp_delta: i32,
    ) -> DomainResult<(Reservation, User)> {
        let _guard = self
            .settlement_lock
            .lock()
            .map_err(|_| DomainError::Internal("settlement lock poisoned".to_string()))?;

        let (user_id, earned_coins) = {
            let mut reservation = self
                .reservations
                .get_mut(&id)
                .ok_or(DomainError::not_found("Reservation"))?;
            if reservation.status == ReservationStatus::Completed {
                return Err(DomainError::AlreadyCompleted);
            }
            reservation.status = ReservationStatus::Completed;
            reservation.saved_co2 = co2_delta;
            (reservation.user_id, reservation.earned_coins)
        };

        let user = {
            let mut user = self
                .users
                .get_mut(&user_id)
                .ok_or(DomainError::not_found("User"))?;
            user.coins += earned_coins;
            user.co2_saved += co2_delta;
            user.xp += xp_delta;
            user.clone()
        };

        let reservation = self
            .reservations
            .get(&id)
            .map(|r| r.clone())
            .ok_or(DomainError::not_found("Reservation"))?;
        Ok((reservation, user))
    }

    async fn station_stats(&self, station_id: i32) -> DomainResult<ReservationStats> {
        let mut stats = ReservationStats::default();
        for r in self.reservations.iter() {
            if r.station_id != station_id {
                continue;
            }
            stats.total += 1;
            if r.is_green {
                stats.green += 1;
            }
            if r.status == ReservationStatus::Completed {
                stats.completed += 1;
            }
        }
        Ok(stats)
    }

    async fn exists_for_station(&self, station_id: i32) -> DomainResult<bool> {
        Ok(self.reservations.iter().any(|r| r.station_id == station_id))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryStore::new();
        let user = NewUser {
            name: "A".to_string(),
            email: "a@test.com".to_string(),
            password_hash: "x".to_string(),
            role: crate::domain::UserRole::Driver,
        };
        UserRepository::insert(&store, user.clone()).await.unwrap();
        let err = UserRepository::insert(&store, user).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn forecast_upsert_overwrites_existing_slot() {
        let store = InMemoryStore::new();
        let entry = ForecastEntry { station_id: 1, day_of_week: 2, hour: 9, predicted_load: 40 };
        store.upsert_many(&[entry]).await.unwrap();
        store
            .upsert_many(&[ForecastEntry { predicted_load: 70, ..entry }])
            .await
            .unwrap();

        let entries = store.find_for_station_day(1, 2).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].predicted_load, 70);
    }

    #[tokio::test]
    async fn station_delete_guarded_by_reservations() {
        let store = InMemoryStore::new();
        let station = StationRepository::insert(
            &store,
            NewStation {
                name: "S".to_string(),
                lat: 0.0,
                lng: 0.0,
                address: None,
                price: 5.0,
                density: 10,
                density_profile: crate::domain::DensityProfile::Outskirt,
                owner_id: None,
            },
        )
        .await
        .unwrap();

        ReservationRepository::insert(
            &store,
            NewReservation {
                user_id: 1,
                station_id: station.id,
                date: Utc::now(),
                hour: "10:00".to_string(),
                is_green: false,
                earned_coins: 10,
            },
        )
        .await
        .unwrap();

        let err = StationRepository::delete(&store, station.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
