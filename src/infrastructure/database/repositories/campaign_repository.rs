//! SeaORM implementation of CampaignRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::badge::Badge;
use crate::domain::campaign::{Campaign, CampaignStatus, NewCampaign};
use crate::domain::{CampaignRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::{badge, campaign, campaign_target_badge};

pub struct SeaOrmCampaignRepository {
    db: DatabaseConnection,
}

impl SeaOrmCampaignRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: campaign::Model) -> Campaign {
    Campaign {
        id: m.id,
        title: m.title,
        description: m.description,
        status: CampaignStatus::from_str(&m.status),
        target: m.target,
        discount: m.discount,
        end_date: m.end_date,
        owner_id: m.owner_id,
        station_id: m.station_id,
        coin_reward: m.coin_reward,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl CampaignRepository for SeaOrmCampaignRepository {
    async fn insert(&self, new: NewCampaign) -> DomainResult<Campaign> {
        debug!(title = %new.title, "inserting campaign");

        let now = Utc::now();
        let model = campaign::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            status: Set(new.status.as_str().to_string()),
            target: Set(new.target),
            discount: Set(new.discount),
            end_date: Set(new.end_date),
            owner_id: Set(new.owner_id),
            station_id: Set(new.station_id),
            coin_reward: Set(new.coin_reward),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Campaign>> {
        let model = campaign::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Campaign>> {
        let models = campaign::Entity::find()
            .filter(campaign::Column::OwnerId.eq(owner_id))
            .order_by_desc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<Campaign>> {
        let models = campaign::Entity::find()
            .filter(campaign::Column::Status.eq(CampaignStatus::Active.as_str()))
            .order_by_desc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, c: Campaign) -> DomainResult<Campaign> {
        let existing = campaign::Entity::find_by_id(c.id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("Campaign"))?;

        let mut active: campaign::ActiveModel = existing.into();
        active.title = Set(c.title);
        active.description = Set(c.description);
        active.status = Set(c.status.as_str().to_string());
        active.target = Set(c.target);
        active.discount = Set(c.discount);
        active.end_date = Set(c.end_date);
        active.station_id = Set(c.station_id);
        active.coin_reward = Set(c.coin_reward);
        active.updated_at = Set(c.updated_at);
        let updated = active.update(&self.db).await?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        // Target badge links go first, the table has no ON DELETE CASCADE
        // guarantee on every backend.
        campaign_target_badge::Entity::delete_many()
            .filter(campaign_target_badge::Column::CampaignId.eq(id))
            .exec(&self.db)
            .await?;
        campaign::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn target_badges(&self, campaign_id: i32) -> DomainResult<Vec<Badge>> {
        let links = campaign_target_badge::Entity::find()
            .filter(campaign_target_badge::Column::CampaignId.eq(campaign_id))
            .all(&self.db)
            .await?;
        let badge_ids: Vec<i32> = links.into_iter().map(|l| l.badge_id).collect();
        if badge_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = badge::Entity::find()
            .filter(badge::Column::Id.is_in(badge_ids))
            .order_by_asc(badge::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| Badge {
                id: m.id,
                name: m.name,
                description: m.description,
                icon: m.icon,
            })
            .collect())
    }

    async fn set_target_badges(&self, campaign_id: i32, badge_ids: &[i32]) -> DomainResult<()> {
        campaign_target_badge::Entity::delete_many()
            .filter(campaign_target_badge::Column::CampaignId.eq(campaign_id))
            .exec(&self.db)
            .await?;

        if badge_ids.is_empty() {
            return Ok(());
        }
        let links: Vec<campaign_target_badge::ActiveModel> = badge_ids
            .iter()
            .map(|&badge_id| campaign_target_badge::ActiveModel {
                campaign_id: Set(campaign_id),
                badge_id: Set(badge_id),
            })
            .collect();
        campaign_target_badge::Entity::insert_many(links)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
