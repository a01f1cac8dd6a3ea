//! Station services: list/detail views, operator dashboard, CRUD and the
//! forecast refresh pipeline

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::application::forecast::{average_density, ForecastModelBuilder};
use crate::application::pricing::{compute_day_slots, round_price, SlotDescriptor};
use crate::domain::campaign::{select_active, Campaign};
use crate::domain::forecast::{day_of_week, ForecastEntry};
use crate::domain::station::{classify_load, DensityProfile, LoadStatus, NewStation, Station};
use crate::domain::{
    CampaignRepository, DomainError, DomainResult, ForecastRepository, ReservationRepository,
    StationRepository, UserRepository,
};

/// Station list entry with density-based status for the map view.
#[derive(Debug, Clone)]
pub struct StationListItem {
    pub station: Station,
    pub status: LoadStatus,
    pub owner_name: Option<String>,
    /// Start of the next discounted window, fixed display label
    pub next_green_hour: &'static str,
}

/// Station detail: the station, the selected campaign and its 24 slots.
#[derive(Debug, Clone)]
pub struct StationDetail {
    pub station: Station,
    pub active_campaign: Option<Campaign>,
    pub slots: Vec<SlotDescriptor>,
}

/// One station's predicted load at a single weekly slot.
#[derive(Debug, Clone)]
pub struct StationForecast {
    pub station: Station,
    pub predicted_load: i32,
}

/// Per-station numbers on the operator dashboard.
#[derive(Debug, Clone)]
pub struct StationSummary {
    pub station: Station,
    pub status: LoadStatus,
    pub reservation_count: i64,
    pub green_reservation_count: i64,
    pub revenue: f64,
}

/// Dashboard aggregates across an operator's stations.
#[derive(Debug, Clone, Default)]
pub struct AggregateStats {
    pub total_revenue: f64,
    pub total_reservations: i64,
    /// Share of green reservations, percent rounded to 2 decimals
    pub green_share: f64,
    pub avg_load: i32,
}

/// Operator dashboard payload.
#[derive(Debug, Clone)]
pub struct OperatorDashboard {
    pub stats: AggregateStats,
    pub stations: Vec<StationSummary>,
}

/// Fields for creating a station through the operator API.
#[derive(Debug, Clone)]
pub struct CreateStationInput {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    pub price: f64,
}

/// Partial update; absent fields keep their current values.
#[derive(Debug, Clone, Default)]
pub struct UpdateStationInput {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub price: Option<f64>,
}

/// Station business logic.
pub struct StationService {
    stations: Arc<dyn StationRepository>,
    forecasts: Arc<dyn ForecastRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    reservations: Arc<dyn ReservationRepository>,
    users: Arc<dyn UserRepository>,
    builder: ForecastModelBuilder,
}

impl StationService {
    pub fn new(
        stations: Arc<dyn StationRepository>,
        forecasts: Arc<dyn ForecastRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        reservations: Arc<dyn ReservationRepository>,
        users: Arc<dyn UserRepository>,
        builder: ForecastModelBuilder,
    ) -> Self {
        Self { stations, forecasts, campaigns, reservations, users, builder }
    }

    /// All stations with density-based three-tier status.
    pub async fn list(&self) -> DomainResult<Vec<StationListItem>> {
        let stations = self.stations.find_all().await?;

        let mut items = Vec::with_capacity(stations.len());
        for station in stations {
            let owner_name = match station.owner_id {
                Some(owner_id) => self
                    .users
                    .find_by_id(owner_id)
                    .await?
                    .map(|u| u.name),
                None => None,
            };
            items.push(StationListItem {
                status: classify_load(station.density),
                owner_name,
                next_green_hour: "23:00",
                station,
            });
        }
        Ok(items)
    }

    /// Station detail with the day's 24 priced slots.
    ///
    /// Forecast loads for the current day of week feed the slots; hours
    /// without a forecast entry silently fall back to the cached density.
    /// A failing campaign lookup degrades to "no campaign".
    pub async fn get(&self, id: i32, now: DateTime<Utc>) -> DomainResult<StationDetail> {
        let station = self
            .stations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        let candidates = self.campaigns.find_active().await.unwrap_or_default();
        let active_campaign = select_active(&candidates, id, now).cloned();

        let dow = day_of_week(now.weekday());
        let mut hourly_loads: [Option<i32>; 24] = [None; 24];
        for entry in self.forecasts.find_for_station_day(id, dow).await.unwrap_or_default() {
            if entry.hour < 24 {
                hourly_loads[entry.hour as usize] = Some(entry.predicted_load);
            }
        }

        let day_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc();
        let slots = compute_day_slots(&station, active_campaign.as_ref(), &hourly_loads, day_start);

        Ok(StationDetail { station, active_campaign, slots })
    }

    /// Every station's predicted load at one (day-of-week, hour) slot.
    pub async fn forecasts_at(
        &self,
        dow: u8,
        hour: u8,
    ) -> DomainResult<Vec<StationForecast>> {
        if dow > 6 || hour > 23 {
            return Err(DomainError::validation("dayOfWeek must be 0-6 and hour 0-23"));
        }

        let entries = self.forecasts.find_by_day_hour(dow, hour).await?;
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(station) = self.stations.find_by_id(entry.station_id).await? {
                items.push(StationForecast { station, predicted_load: entry.predicted_load });
            }
        }
        Ok(items)
    }

    /// Operator dashboard: per-station stats plus aggregates.
    pub async fn my_stations(&self, owner_id: i32) -> DomainResult<OperatorDashboard> {
        let stations = self.stations.find_by_owner(owner_id).await?;

        let mut summaries = Vec::with_capacity(stations.len());
        let mut total_revenue = 0.0;
        let mut total_reservations = 0i64;
        let mut total_green = 0i64;
        let mut total_load = 0i64;

        for station in stations {
            let stats = self
                .reservations
                .station_stats(station.id)
                .await
                .unwrap_or_default();
            let revenue = stats.completed as f64 * station.price;

            total_revenue += revenue;
            total_reservations += stats.total;
            total_green += stats.green;
            total_load += station.density as i64;

            summaries.push(StationSummary {
                status: classify_load(station.density),
                reservation_count: stats.total,
                green_reservation_count: stats.green,
                revenue: round_price(revenue),
                station,
            });
        }

        let green_share = if total_reservations > 0 {
            round_price(total_green as f64 / total_reservations as f64 * 100.0)
        } else {
            0.0
        };
        let avg_load = if summaries.is_empty() {
            0
        } else {
            (total_load as f64 / summaries.len() as f64).round() as i32
        };

        Ok(OperatorDashboard {
            stats: AggregateStats {
                total_revenue: round_price(total_revenue),
                total_reservations,
                green_share,
                avg_load,
            },
            stations: summaries,
        })
    }

    pub async fn create(&self, owner_id: i32, input: CreateStationInput) -> DomainResult<Station> {
        let station = self
            .stations
            .insert(NewStation {
                name: input.name,
                lat: input.lat,
                lng: input.lng,
                address: input.address,
                price: input.price,
                density: 50,
                density_profile: DensityProfile::Suburban,
                owner_id: Some(owner_id),
            })
            .await?;
        info!(station_id = station.id, owner_id, "station created");
        Ok(station)
    }

    /// Fetch a station the caller must own. Foreign stations are Forbidden.
    pub async fn find_owned(&self, id: i32, owner_id: i32) -> DomainResult<Station> {
        let station = self
            .stations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Station"))?;
        if station.owner_id != Some(owner_id) {
            return Err(DomainError::Forbidden);
        }
        Ok(station)
    }

    pub async fn update(&self, id: i32, input: UpdateStationInput) -> DomainResult<Station> {
        let mut station = self
            .stations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        if let Some(name) = input.name {
            station.name = name;
        }
        if let Some(lat) = input.lat {
            station.lat = lat;
        }
        if let Some(lng) = input.lng {
            station.lng = lng;
        }
        if let Some(address) = input.address {
            station.address = Some(address);
        }
        if let Some(price) = input.price {
            station.price = price;
        }

        self.stations.update(station).await
    }

    /// Delete a station. Stations with linked reservations are never
    /// deleted; the caller gets a Conflict instead.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.stations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        if self.reservations.exists_for_station(id).await? {
            return Err(DomainError::Conflict(
                "Station has linked reservations".to_string(),
            ));
        }
        self.stations.delete(id).await
    }

    /// Rebuild every station's weekly forecast and cached density.
    ///
    /// Each station gets its own RNG derived from the base seed and its id,
    /// so a refresh is reproducible end to end. Runs offline or from the
    /// seeding binary, not on the request path. Returns the number of
    /// upserted forecast entries.
    pub async fn refresh_forecasts(&self, base_seed: u64) -> DomainResult<usize> {
        let stations = self.stations.find_all().await?;
        let mut total = 0usize;

        for station in stations {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(station.id as u64));
            let weekly = self.builder.build(station.density_profile, &mut rng);

            let entries: Vec<ForecastEntry> = weekly
                .iter()
                .map(|f| ForecastEntry {
                    station_id: station.id,
                    day_of_week: f.day_of_week,
                    hour: f.hour,
                    predicted_load: f.predicted_load,
                })
                .collect();
            self.forecasts.upsert_many(&entries).await?;

            let density = average_density(&weekly);
            self.stations.update_density(station.id, density).await?;

            debug!(
                station_id = station.id,
                entries = entries.len(),
                density,
                "forecast refreshed"
            );
            total += entries.len();
        }

        info!(entries = total, "forecast refresh completed");
        Ok(total)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::forecast::ProfileCatalog;
    use crate::domain::campaign::{CampaignStatus, NewCampaign};
    use crate::domain::reservation::NewReservation;
    use crate::domain::user::{NewUser, UserRole};
    use crate::infrastructure::memory::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> StationService {
        StationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            ForecastModelBuilder::new(ProfileCatalog::default()),
        )
    }

    async fn seed_station(store: &Arc<InMemoryStore>, price: f64, density: i32) -> Station {
        StationRepository::insert(
            store.as_ref(),
            NewStation {
                name: "Magnesia".to_string(),
                lat: 38.61,
                lng: 27.4,
                address: Some("Manisa".to_string()),
                price,
                density,
                density_profile: DensityProfile::Central,
                owner_id: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn list_classifies_by_density() {
        let store = Arc::new(InMemoryStore::new());
        seed_station(&store, 7.5, 80).await;
        seed_station(&store, 6.0, 50).await;
        seed_station(&store, 5.0, 20).await;

        let items = service(&store).list().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].status, LoadStatus::Red);
        assert_eq!(items[1].status, LoadStatus::Yellow);
        assert_eq!(items[2].status, LoadStatus::Green);
        assert!(items.iter().all(|i| i.next_green_hour == "23:00"));
    }

    #[tokio::test]
    async fn detail_has_24_slots_with_forecast_loads() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 10.0, 33).await;
        let now = Utc::now();
        let dow = day_of_week(now.weekday());

        store
            .upsert_many(&[ForecastEntry {
                station_id: station.id,
                day_of_week: dow,
                hour: 9,
                predicted_load: 88,
            }])
            .await
            .unwrap();

        let detail = service(&store).get(station.id, now).await.unwrap();
        assert_eq!(detail.slots.len(), 24);
        assert_eq!(detail.slots[9].load, 88);
        // No forecast entry for hour 10: cached density fallback.
        assert_eq!(detail.slots[10].load, 33);
    }

    #[tokio::test]
    async fn detail_applies_station_campaign() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 10.0, 33).await;
        CampaignRepository::insert(
            store.as_ref(),
            NewCampaign {
                title: "Night owl".to_string(),
                description: String::new(),
                status: CampaignStatus::Active,
                target: String::new(),
                discount: "%20".to_string(),
                end_date: None,
                owner_id: 1,
                station_id: Some(station.id),
                coin_reward: 100,
            },
        )
        .await
        .unwrap();

        let detail = service(&store).get(station.id, Utc::now()).await.unwrap();
        assert!(detail.active_campaign.is_some());
        assert_eq!(detail.slots[12].price, 8.0); // 10 * (1 - 0.20), non-green hour
        assert_eq!(detail.slots[12].coins, 110); // 10 + 100
    }

    #[tokio::test]
    async fn missing_station_detail_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = service(&store).get(9, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station" }));
    }

    #[tokio::test]
    async fn refresh_writes_168_entries_and_recomputes_density() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 7.5, 0).await;

        let total = service(&store).refresh_forecasts(42).await.unwrap();
        assert_eq!(total, 168);

        let monday = store.find_for_station_day(station.id, 0).await.unwrap();
        assert_eq!(monday.len(), 24);

        let refreshed = StationRepository::find_by_id(store.as_ref(), station.id)
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.density > 0);
    }

    #[tokio::test]
    async fn refresh_is_reproducible_for_a_given_seed() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 7.5, 0).await;
        let svc = service(&store);

        svc.refresh_forecasts(7).await.unwrap();
        let first = store.find_for_station_day(station.id, 3).await.unwrap();
        svc.refresh_forecasts(7).await.unwrap();
        let second = store.find_for_station_day(station.id, 3).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn dashboard_aggregates_owner_stations() {
        let store = Arc::new(InMemoryStore::new());
        let owner = UserRepository::insert(
            store.as_ref(),
            NewUser {
                name: "Operator".to_string(),
                email: "op@zorlu.com".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Operator,
            },
        )
        .await
        .unwrap();

        let station = StationRepository::insert(
            store.as_ref(),
            NewStation {
                name: "Own".to_string(),
                lat: 0.0,
                lng: 0.0,
                address: None,
                price: 10.0,
                density: 70,
                density_profile: DensityProfile::Central,
                owner_id: Some(owner.id),
            },
        )
        .await
        .unwrap();

        // Two reservations, one green and completed.
        let completed = ReservationRepository::insert(
            store.as_ref(),
            NewReservation {
                user_id: owner.id,
                station_id: station.id,
                date: Utc::now(),
                hour: "23:00".to_string(),
                is_green: true,
                earned_coins: 50,
            },
        )
        .await
        .unwrap();
        store.complete(completed.id, 2.5, 100).await.unwrap();
        ReservationRepository::insert(
            store.as_ref(),
            NewReservation {
                user_id: owner.id,
                station_id: station.id,
                date: Utc::now(),
                hour: "12:00".to_string(),
                is_green: false,
                earned_coins: 10,
            },
        )
        .await
        .unwrap();

        let dashboard = service(&store).my_stations(owner.id).await.unwrap();
        assert_eq!(dashboard.stations.len(), 1);
        assert_eq!(dashboard.stations[0].reservation_count, 2);
        assert_eq!(dashboard.stations[0].green_reservation_count, 1);
        assert_eq!(dashboard.stations[0].revenue, 10.0);
        assert_eq!(dashboard.stats.total_reservations, 2);
        assert_eq!(dashboard.stats.green_share, 50.0);
        assert_eq!(dashboard.stats.avg_load, 70);
        assert_eq!(dashboard.stations[0].status, LoadStatus::Red);
    }

    #[tokio::test]
    async fn delete_with_reservations_is_a_conflict() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 5.0, 10).await;
        ReservationRepository::insert(
            store.as_ref(),
            NewReservation {
                user_id: 1,
                station_id: station.id,
                date: Utc::now(),
                hour: "09:00".to_string(),
                is_green: false,
                earned_coins: 10,
            },
        )
        .await
        .unwrap();

        let err = service(&store).delete(station.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() {
        let store = Arc::new(InMemoryStore::new());
        let station = seed_station(&store, 5.0, 10).await;

        let updated = service(&store)
            .update(
                station.id,
                UpdateStationInput { price: Some(6.5), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 6.5);
        assert_eq!(updated.name, "Magnesia");
        assert_eq!(updated.address.as_deref(), Some("Manisa"));
    }
}
