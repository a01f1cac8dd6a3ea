//! Demo data seeding: badge catalog, demo accounts, the Manisa station
//! network and badge-targeted campaigns

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::info;

use crate::application::stations::StationService;
use crate::auth::password::hash_password;
use crate::domain::badge::NewBadge;
use crate::domain::campaign::{CampaignStatus, NewCampaign};
use crate::domain::station::{DensityProfile, NewStation};
use crate::domain::user::{NewUser, UserRole};
use crate::domain::{
    BadgeRepository, CampaignRepository, DomainError, DomainResult, StationRepository,
    UserRepository,
};

/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "demo123";

struct StationSeed {
    name: &'static str,
    lat: f64,
    lng: f64,
    price: f64,
    address: &'static str,
    density: i32,
    profile: DensityProfile,
}

const STATION_SEEDS: &[StationSeed] = &[
    StationSeed { name: "Manisa Magnesia AVM", lat: 38.614, lng: 27.405, price: 7.5, address: "Laleli, Magnesia AVM, Manisa", density: 85, profile: DensityProfile::Central },
    StationSeed { name: "Uncubozköy Kampüs", lat: 38.625, lng: 27.420, price: 6.0, address: "Uncubozköy, CBÜ Kampüs, Manisa", density: 40, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa Organize Sanayi", lat: 38.580, lng: 27.350, price: 8.5, address: "MOSB 1. Kısım, Manisa", density: 90, profile: DensityProfile::Central },
    StationSeed { name: "Manisa Prime AVM", lat: 38.618, lng: 27.412, price: 7.8, address: "Güzelyurt, Manisa Prime, Manisa", density: 65, profile: DensityProfile::Suburban },
    StationSeed { name: "Spil Dağı Milli Parkı", lat: 38.550, lng: 27.450, price: 9.5, address: "Spil Dağı Zirve Yolu, Manisa", density: 10, profile: DensityProfile::Outskirt },
    StationSeed { name: "Manisa Şehir Hastanesi", lat: 38.605, lng: 27.380, price: 6.5, address: "Adnan Menderes, Şehir Hastanesi, Manisa", density: 75, profile: DensityProfile::Central },
    StationSeed { name: "Muradiye Kampüs", lat: 38.650, lng: 27.320, price: 5.5, address: "Muradiye, CBÜ Kampüs, Manisa", density: 30, profile: DensityProfile::Outskirt },
    StationSeed { name: "Saruhanlı Merkez", lat: 38.730, lng: 27.570, price: 7.0, address: "Saruhanlı Meydan, Manisa", density: 20, profile: DensityProfile::Outskirt },
    StationSeed { name: "Turgutlu Otoyol Çıkışı", lat: 38.490, lng: 27.700, price: 8.0, address: "Turgutlu E-96 Karayolu, Manisa", density: 50, profile: DensityProfile::Suburban },
    StationSeed { name: "Akhisar Novada", lat: 38.920, lng: 27.830, price: 7.5, address: "Akhisar Çevre Yolu, Manisa", density: 60, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa Garaj", lat: 38.610, lng: 27.430, price: 6.8, address: "Yeni Garaj, Manisa", density: 55, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa Valilik", lat: 38.612, lng: 27.425, price: 7.2, address: "Hükümet Konağı, Manisa", density: 45, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa 19 Mayıs Stadyumu", lat: 38.616, lng: 27.418, price: 6.5, address: "Stadyum Çevresi, Manisa", density: 35, profile: DensityProfile::Outskirt },
    StationSeed { name: "Manisa Celal Bayar Hastanesi", lat: 38.628, lng: 27.422, price: 6.2, address: "Hastane Otoparkı, Manisa", density: 70, profile: DensityProfile::Central },
    StationSeed { name: "Manisa Kenan Evren Sanayi", lat: 38.600, lng: 27.390, price: 7.0, address: "Sanayi Sitesi, Manisa", density: 80, profile: DensityProfile::Central },
    StationSeed { name: "Manisa Tarzan Meydanı", lat: 38.613, lng: 27.426, price: 7.3, address: "Tarzan Meydanı, Manisa", density: 60, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa 45 Park AVM", lat: 38.620, lng: 27.395, price: 7.6, address: "Güzelyurt, 45 Park, Manisa", density: 50, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa Tren Garı", lat: 38.608, lng: 27.432, price: 6.5, address: "İstasyon Cad., Manisa", density: 30, profile: DensityProfile::Outskirt },
    StationSeed { name: "Manisa Mesir Tabiat Parkı", lat: 38.622, lng: 27.410, price: 7.5, address: "Mesir, Manisa", density: 65, profile: DensityProfile::Suburban },
    StationSeed { name: "Manisa Kent Park", lat: 38.612, lng: 27.415, price: 7.2, address: "Kent Park, Manisa", density: 75, profile: DensityProfile::Central },
    StationSeed { name: "Manisa Ulupark", lat: 38.614, lng: 27.428, price: 7.0, address: "Ulupark, Manisa", density: 85, profile: DensityProfile::Central },
    StationSeed { name: "İzmir Bornova DC", lat: 38.460, lng: 27.220, price: 9.0, address: "Bornova Merkez, İzmir", density: 95, profile: DensityProfile::Central },
    StationSeed { name: "Alsancak Liman", lat: 38.435, lng: 27.150, price: 10.0, address: "Alsancak Liman Cad., İzmir", density: 80, profile: DensityProfile::Central },
];

struct BadgeSeed {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
}

const BADGE_SEEDS: &[BadgeSeed] = &[
    BadgeSeed { name: "Gece Kuşu", description: "Gece tarifesinde 5 şarj", icon: "🦉" },
    BadgeSeed { name: "Eco Şampiyonu", description: "Sadece yeşil enerjili istasyonları tercih et", icon: "🌱" },
    BadgeSeed { name: "Hafta Sonu Savaşçısı", description: "Hafta sonu şarj et", icon: "🏖️" },
    BadgeSeed { name: "Erken Kalkan", description: "Sabah 06:00 - 09:00 arası şarj et", icon: "🌅" },
    BadgeSeed { name: "Uzun Yolcu", description: "Şehirlerarası istasyonlarda şarj et", icon: "🛣️" },
];

struct CampaignSeed {
    title: &'static str,
    description: &'static str,
    target: &'static str,
    discount: &'static str,
    coin_reward: i32,
    end_date: (i32, u32, u32),
    badge_index: usize,
}

const CAMPAIGN_SEEDS: &[CampaignSeed] = &[
    CampaignSeed {
        title: "Gece Kuşu Özel - %20 İndirim",
        description: "Gece 22:00 - 06:00 arası şarj et, %20 indirim kazan!",
        target: "Gece Kuşu badge'ine sahip kullanıcılar",
        discount: "%20",
        coin_reward: 100,
        end_date: (2026, 3, 1),
        badge_index: 0,
    },
    CampaignSeed {
        title: "Eco Fırsat - 2x Coin",
        description: "Yeşil enerjili istasyonlarda şarj et, 2 kat coin kazan!",
        target: "Eco Şampiyonu badge'ine sahip kullanıcılar",
        discount: "2x Coin",
        coin_reward: 200,
        end_date: (2026, 2, 28),
        badge_index: 1,
    },
    CampaignSeed {
        title: "Hafta Sonu Kaçamağı - Ücretsiz İlk Saat",
        description: "Hafta sonu şarj etmeyi seven sürücülere özel!",
        target: "Hafta Sonu Savaşçısı badge'ine sahip kullanıcılar",
        discount: "İlk saat ücretsiz",
        coin_reward: 75,
        end_date: (2026, 2, 15),
        badge_index: 2,
    },
    CampaignSeed {
        title: "Erken Kalkan Yol Alır - %15 İndirim",
        description: "Sabah 06:00 - 09:00 arası şarj et, %15 indirim!",
        target: "Erken Kalkan badge'ine sahip kullanıcılar",
        discount: "%15",
        coin_reward: 50,
        end_date: (2026, 3, 15),
        badge_index: 3,
    },
];

/// Counts reported after a seed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub badges: usize,
    pub stations: usize,
    pub campaigns: usize,
    pub forecasts: usize,
}

/// Populates an empty database with the demo catalog. The caller is
/// responsible for wiping first (the seed binary recreates the schema).
pub struct Seeder {
    users: Arc<dyn UserRepository>,
    badges: Arc<dyn BadgeRepository>,
    stations: Arc<dyn StationRepository>,
    campaigns: Arc<dyn CampaignRepository>,
}

impl Seeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        badges: Arc<dyn BadgeRepository>,
        stations: Arc<dyn StationRepository>,
        campaigns: Arc<dyn CampaignRepository>,
    ) -> Self {
        Self { users, badges, stations, campaigns }
    }

    /// Seed badges, demo users, stations and campaigns, then run one
    /// forecast refresh so every station starts with a full weekly model.
    pub async fn run(
        &self,
        station_service: &StationService,
        forecast_seed: u64,
    ) -> DomainResult<SeedSummary> {
        let mut summary = SeedSummary::default();

        let mut badge_ids = Vec::with_capacity(BADGE_SEEDS.len());
        for bs in BADGE_SEEDS {
            let badge = self
                .badges
                .insert(NewBadge {
                    name: bs.name.to_string(),
                    description: bs.description.to_string(),
                    icon: bs.icon.to_string(),
                })
                .await?;
            badge_ids.push(badge.id);
        }
        summary.badges = badge_ids.len();

        let password_hash = hash_password(DEMO_PASSWORD)
            .map_err(|e| DomainError::Internal(format!("Password hashing failed: {}", e)))?;

        let operator = self
            .users
            .insert(NewUser {
                name: "Zorlu Enerji".to_string(),
                email: "info@zorlu.com".to_string(),
                password_hash: password_hash.clone(),
                role: UserRole::Operator,
            })
            .await?;
        let driver = self
            .users
            .insert(NewUser {
                name: "Hackathon Sürücü".to_string(),
                email: "driver@test.com".to_string(),
                password_hash,
                role: UserRole::Driver,
            })
            .await?;
        summary.users = 2;

        // The demo driver starts with the four campaign-targeted badges.
        for &badge_id in badge_ids.iter().take(4) {
            self.badges.add_user_badge(driver.id, badge_id).await?;
        }

        for ss in STATION_SEEDS {
            self.stations
                .insert(NewStation {
                    name: ss.name.to_string(),
                    lat: ss.lat,
                    lng: ss.lng,
                    address: Some(ss.address.to_string()),
                    price: ss.price,
                    density: ss.density,
                    density_profile: ss.profile,
                    owner_id: Some(operator.id),
                })
                .await?;
        }
        summary.stations = STATION_SEEDS.len();

        summary.forecasts = station_service.refresh_forecasts(forecast_seed).await?;

        for cs in CAMPAIGN_SEEDS {
            let (y, m, d) = cs.end_date;
            let end_date = Utc
                .with_ymd_and_hms(y, m, d, 0, 0, 0)
                .single()
                .ok_or_else(|| DomainError::Internal("invalid seed end date".to_string()))?;

            let campaign = self
                .campaigns
                .insert(NewCampaign {
                    title: cs.title.to_string(),
                    description: cs.description.to_string(),
                    status: CampaignStatus::Active,
                    target: cs.target.to_string(),
                    discount: cs.discount.to_string(),
                    end_date: Some(end_date),
                    owner_id: operator.id,
                    station_id: None,
                    coin_reward: cs.coin_reward,
                })
                .await?;
            self.campaigns
                .set_target_badges(campaign.id, &[badge_ids[cs.badge_index]])
                .await?;
        }
        summary.campaigns = CAMPAIGN_SEEDS.len();

        info!(
            users = summary.users,
            badges = summary.badges,
            stations = summary.stations,
            campaigns = summary.campaigns,
            forecasts = summary.forecasts,
            "seed completed"
        );
        Ok(summary)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::forecast::{ForecastModelBuilder, ProfileCatalog};
    use crate::infrastructure::memory::InMemoryStore;

    #[tokio::test]
    async fn seed_populates_every_catalog() {
        let store = Arc::new(InMemoryStore::new());
        let station_service = StationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            // Short history keeps the test fast; real seeding uses 60 days.
            ForecastModelBuilder::new(ProfileCatalog::default()).with_history_days(7),
        );
        let seeder = Seeder::new(store.clone(), store.clone(), store.clone(), store.clone());

        let summary = seeder.run(&station_service, 42).await.unwrap();

        assert_eq!(summary.users, 2);
        assert_eq!(summary.badges, BADGE_SEEDS.len());
        assert_eq!(summary.stations, STATION_SEEDS.len());
        assert_eq!(summary.campaigns, CAMPAIGN_SEEDS.len());
        assert_eq!(summary.forecasts, STATION_SEEDS.len() * 168);

        let driver = store.find_by_email("driver@test.com").await.unwrap().unwrap();
        let badges = store.find_for_user(driver.id).await.unwrap();
        assert_eq!(badges.len(), 4);
    }
}
