//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::station::{DensityProfile, NewStation, Station};
use crate::domain::{DomainError, DomainResult, StationRepository};
use crate::infrastructure::database::entities::station;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: station::Model) -> Station {
    Station {
        id: m.id,
        name: m.name,
        lat: m.lat,
        lng: m.lng,
        address: m.address,
        price: m.price,
        density: m.density,
        density_profile: DensityProfile::from_str(&m.density_profile),
        owner_id: m.owner_id,
        created_at: m.created_at,
    }
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn insert(&self, new: NewStation) -> DomainResult<Station> {
        debug!(name = %new.name, "inserting station");

        let model = station::ActiveModel {
            name: Set(new.name),
            lat: Set(new.lat),
            lng: Set(new.lng),
            address: Set(new.address),
            price: Set(new.price),
            density: Set(new.density),
            density_profile: Set(new.density_profile.as_str().to_string()),
            owner_id: Set(new.owner_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .filter(station::Column::OwnerId.eq(owner_id))
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, s: Station) -> DomainResult<Station> {
        let existing = station::Entity::find_by_id(s.id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        let mut active: station::ActiveModel = existing.into();
        active.name = Set(s.name);
        active.lat = Set(s.lat);
        active.lng = Set(s.lng);
        active.address = Set(s.address);
        active.price = Set(s.price);
        active.density_profile = Set(s.density_profile.as_str().to_string());
        let updated = active.update(&self.db).await?;
        Ok(model_to_domain(updated))
    }

    async fn update_density(&self, id: i32, density: i32) -> DomainResult<()> {
        let existing = station::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("Station"))?;

        let mut active: station::ActiveModel = existing.into();
        active.density = Set(density);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        station::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if e.to_string().contains("FOREIGN KEY") {
                    DomainError::Conflict("Station has linked reservations".to_string())
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }
}
