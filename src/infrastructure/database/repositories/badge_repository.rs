//! SeaORM implementation of BadgeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::badge::{Badge, NewBadge};
use crate::domain::{BadgeRepository, DomainResult};
use crate::infrastructure::database::entities::{badge, user_badge};

pub struct SeaOrmBadgeRepository {
    db: DatabaseConnection,
}

impl SeaOrmBadgeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: badge::Model) -> Badge {
    Badge {
        id: m.id,
        name: m.name,
        description: m.description,
        icon: m.icon,
    }
}

#[async_trait]
impl BadgeRepository for SeaOrmBadgeRepository {
    async fn insert(&self, new: NewBadge) -> DomainResult<Badge> {
        let model = badge::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            icon: Set(new.icon),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn find_all(&self) -> DomainResult<Vec<Badge>> {
        let models = badge::Entity::find()
            .order_by_asc(badge::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_user(&self, user_id: i32) -> DomainResult<Vec<Badge>> {
        let links = user_badge::Entity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
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
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn add_user_badge(&self, user_id: i32, badge_id: i32) -> DomainResult<()> {
        let link = user_badge::ActiveModel {
            user_id: Set(user_id),
            badge_id: Set(badge_id),
            earned_at: Set(Utc::now()),
        };
        user_badge::Entity::insert(link)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    user_badge::Column::UserId,
                    user_badge::Column::BadgeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
