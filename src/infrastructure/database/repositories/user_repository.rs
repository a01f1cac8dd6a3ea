//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

use crate::domain::user::{NewUser, User, UserRole};
use crate::domain::{DomainError, DomainResult, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password,
        role: UserRole::from_str(&m.role),
        coins: m.coins,
        co2_saved: m.co2_saved,
        xp: m.xp,
        created_at: m.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, new: NewUser) -> DomainResult<User> {
        debug!(email = %new.email, "inserting user");

        let model = user::ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            password: Set(new.password_hash),
            role: Set(new.role.as_str().to_string()),
            coins: Set(0),
            co2_saved: Set(0.0),
            xp: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                DomainError::Conflict("Email already registered".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn update_profile(&self, id: i32, name: String, email: String) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("User"))?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name);
        active.email = Set(email);
        let updated = active.update(&self.db).await?;
        Ok(model_to_domain(updated))
    }

    async fn leaderboard(&self, limit: u64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::Xp)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
