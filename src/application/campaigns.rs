//! Campaign management for operators and the campaign feed for drivers

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::settlement::parse_reservation_date;
use crate::domain::badge::Badge;
use crate::domain::campaign::{Campaign, CampaignStatus, NewCampaign};
use crate::domain::{
    CampaignRepository, DomainError, DomainResult, StationRepository,
};

/// Campaign with its resolved station name and target badges.
#[derive(Debug, Clone)]
pub struct CampaignWithBadges {
    pub campaign: Campaign,
    pub station_name: Option<String>,
    pub target_badges: Vec<Badge>,
}

/// Campaign feed entry for drivers. `matched_badges` lists the target
/// badges the viewing user has already earned.
#[derive(Debug, Clone)]
pub struct CampaignForUser {
    pub campaign: Campaign,
    pub target_badges: Vec<Badge>,
    pub matched_badges: Vec<Badge>,
}

/// Fields accepted when an operator creates a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaignInput {
    pub title: String,
    pub description: String,
    pub target: String,
    pub discount: String,
    /// RFC 3339 or plain YYYY-MM-DD; None = no expiry
    pub end_date: Option<String>,
    pub station_id: Option<i32>,
    pub coin_reward: i32,
    pub target_badge_ids: Vec<i32>,
}

/// Partial campaign update; absent fields keep their current values.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaignInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub target: Option<String>,
    pub discount: Option<String>,
    pub end_date: Option<String>,
    pub station_id: Option<Option<i32>>,
    pub coin_reward: Option<i32>,
    pub target_badge_ids: Option<Vec<i32>>,
}

/// Campaign business logic.
pub struct CampaignService {
    campaigns: Arc<dyn CampaignRepository>,
    stations: Arc<dyn StationRepository>,
    badges: Arc<dyn crate::domain::BadgeRepository>,
}

impl CampaignService {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stations: Arc<dyn StationRepository>,
        badges: Arc<dyn crate::domain::BadgeRepository>,
    ) -> Self {
        Self { campaigns, stations, badges }
    }

    /// An operator's own campaigns, newest first, with badges and station
    /// names resolved.
    pub async fn list_by_owner(&self, owner_id: i32) -> DomainResult<Vec<CampaignWithBadges>> {
        let campaigns = self.campaigns.find_by_owner(owner_id).await?;

        let mut items = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            items.push(self.with_badges(campaign).await?);
        }
        Ok(items)
    }

    /// Active, unexpired campaigns for the driver feed. Matched badges are
    /// computed against the viewing user's earned set.
    pub async fn list_for_user(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<CampaignForUser>> {
        let active = self.campaigns.find_active().await?;
        let earned = self.badges.find_for_user(user_id).await?;

        let mut items = Vec::new();
        for campaign in active {
            if let Some(end) = campaign.end_date {
                if end <= now {
                    continue;
                }
            }
            let target_badges = self.campaigns.target_badges(campaign.id).await?;
            let matched_badges = target_badges
                .iter()
                .filter(|b| earned.iter().any(|e| e.id == b.id))
                .cloned()
                .collect();
            items.push(CampaignForUser { campaign, target_badges, matched_badges });
        }
        Ok(items)
    }

    pub async fn create(
        &self,
        owner_id: i32,
        input: CreateCampaignInput,
    ) -> DomainResult<CampaignWithBadges> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        let end_date = input
            .end_date
            .as_deref()
            .map(parse_reservation_date)
            .transpose()?;
        if let Some(station_id) = input.station_id {
            self.stations
                .find_by_id(station_id)
                .await?
                .ok_or(DomainError::not_found("Station"))?;
        }

        let campaign = self
            .campaigns
            .insert(NewCampaign {
                title: input.title,
                description: input.description,
                status: CampaignStatus::Active,
                target: input.target,
                discount: input.discount,
                end_date,
                owner_id,
                station_id: input.station_id,
                coin_reward: input.coin_reward,
            })
            .await?;

        if !input.target_badge_ids.is_empty() {
            self.campaigns
                .set_target_badges(campaign.id, &input.target_badge_ids)
                .await?;
        }

        info!(campaign_id = campaign.id, owner_id, "campaign created");
        self.with_badges(campaign).await
    }

    pub async fn update(
        &self,
        id: i32,
        owner_id: i32,
        input: UpdateCampaignInput,
    ) -> DomainResult<CampaignWithBadges> {
        let mut campaign = self.owned_campaign(id, owner_id).await?;

        if let Some(title) = input.title {
            campaign.title = title;
        }
        if let Some(description) = input.description {
            campaign.description = description;
        }
        if let Some(status) = input.status {
            campaign.status = CampaignStatus::from_str(&status);
        }
        if let Some(target) = input.target {
            campaign.target = target;
        }
        if let Some(discount) = input.discount {
            campaign.discount = discount;
        }
        if let Some(raw) = input.end_date {
            campaign.end_date = Some(parse_reservation_date(&raw)?);
        }
        if let Some(station_id) = input.station_id {
            if let Some(sid) = station_id {
                self.stations
                    .find_by_id(sid)
                    .await?
                    .ok_or(DomainError::not_found("Station"))?;
            }
            campaign.station_id = station_id;
        }
        if let Some(coin_reward) = input.coin_reward {
            campaign.coin_reward = coin_reward;
        }
        campaign.updated_at = Utc::now();

        let campaign = self.campaigns.update(campaign).await?;
        if let Some(badge_ids) = input.target_badge_ids {
            self.campaigns.set_target_badges(campaign.id, &badge_ids).await?;
        }
        self.with_badges(campaign).await
    }

    pub async fn delete(&self, id: i32, owner_id: i32) -> DomainResult<()> {
        self.owned_campaign(id, owner_id).await?;
        self.campaigns.delete(id).await?;
        info!(campaign_id = id, owner_id, "campaign deleted");
        Ok(())
    }

    async fn owned_campaign(&self, id: i32, owner_id: i32) -> DomainResult<Campaign> {
        let campaign = self
            .campaigns
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Campaign"))?;
        if campaign.owner_id != owner_id {
            return Err(DomainError::Forbidden);
        }
        Ok(campaign)
    }

    async fn with_badges(&self, campaign: Campaign) -> DomainResult<CampaignWithBadges> {
        let target_badges = self.campaigns.target_badges(campaign.id).await?;
        let station_name = match campaign.station_id {
            Some(sid) => self.stations.find_by_id(sid).await?.map(|s| s.name),
            None => None,
        };
        Ok(CampaignWithBadges { campaign, station_name, target_badges })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::badge::NewBadge;
    use crate::domain::station::{DensityProfile, NewStation};
    use crate::domain::BadgeRepository;
    use crate::infrastructure::memory::InMemoryStore;
    use chrono::Duration;

    fn service(store: &Arc<InMemoryStore>) -> CampaignService {
        CampaignService::new(store.clone(), store.clone(), store.clone())
    }

    fn input(title: &str) -> CreateCampaignInput {
        CreateCampaignInput {
            title: title.to_string(),
            description: "desc".to_string(),
            target: "All drivers".to_string(),
            discount: "%20".to_string(),
            end_date: None,
            station_id: None,
            coin_reward: 0,
            target_badge_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_links_target_badges() {
        let store = Arc::new(InMemoryStore::new());
        let badge = BadgeRepository::insert(
            store.as_ref(),
            NewBadge {
                name: "Gece Kuşu".to_string(),
                description: String::new(),
                icon: "🦉".to_string(),
            },
        )
        .await
        .unwrap();

        let mut req = input("Night charge");
        req.target_badge_ids = vec![badge.id];
        let created = service(&store).create(1, req).await.unwrap();

        assert_eq!(created.target_badges.len(), 1);
        assert_eq!(created.target_badges[0].name, "Gece Kuşu");
    }

    #[tokio::test]
    async fn create_rejects_blank_title_and_bad_date() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let err = svc.create(1, input("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut req = input("ok");
        req.end_date = Some("not-a-date".to_string());
        let err = svc.create(1, req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_station() {
        let store = Arc::new(InMemoryStore::new());
        let mut req = input("Scoped");
        req.station_id = Some(99);
        let err = service(&store).create(1, req).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station" }));
    }

    #[tokio::test]
    async fn update_is_owner_only() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let created = svc.create(1, input("Mine")).await.unwrap();

        let err = svc
            .update(created.campaign.id, 2, UpdateCampaignInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let updated = svc
            .update(
                created.campaign.id,
                1,
                UpdateCampaignInput {
                    discount: Some("%30".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.campaign.discount, "%30");
        assert_eq!(updated.campaign.title, "Mine");
    }

    #[tokio::test]
    async fn user_feed_skips_expired_and_marks_matches() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let badge = BadgeRepository::insert(
            store.as_ref(),
            NewBadge {
                name: "Yeşil Savaşçı".to_string(),
                description: String::new(),
                icon: "🌱".to_string(),
            },
        )
        .await
        .unwrap();
        store.add_user_badge(5, badge.id).await.unwrap();

        let mut targeted = input("Targeted");
        targeted.target_badge_ids = vec![badge.id];
        svc.create(1, targeted).await.unwrap();

        let mut expired = input("Expired");
        expired.end_date = Some((Utc::now() - Duration::days(1)).to_rfc3339());
        svc.create(1, expired).await.unwrap();

        let feed = svc.list_for_user(5, Utc::now()).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].campaign.title, "Targeted");
        assert_eq!(feed[0].matched_badges.len(), 1);
    }

    #[tokio::test]
    async fn owner_list_resolves_station_name() {
        let store = Arc::new(InMemoryStore::new());
        let station = StationRepository::insert(
            store.as_ref(),
            NewStation {
                name: "Bornova".to_string(),
                lat: 38.46,
                lng: 27.22,
                address: None,
                price: 6.0,
                density: 40,
                density_profile: DensityProfile::Suburban,
                owner_id: Some(1),
            },
        )
        .await
        .unwrap();

        let svc = service(&store);
        let mut req = input("Scoped");
        req.station_id = Some(station.id);
        svc.create(1, req).await.unwrap();

        let list = svc.list_by_owner(1).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].station_name.as_deref(), Some("Bornova"));
    }
}
