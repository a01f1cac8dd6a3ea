//! SeaORM implementation of ReservationRepository
//!
//! Settlement runs inside a database transaction so the completed-check,
//! the reservation update and the user counter credit commit or roll back
//! as one unit.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};
use tracing::debug;

use crate::domain::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult, ReservationRepository, ReservationStats};
use crate::infrastructure::database::entities::{reservation, user};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        station_id: m.station_id,
        date: m.date,
        hour: m.hour,
        is_green: m.is_green,
        earned_coins: m.earned_coins,
        saved_co2: m.saved_co2,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

fn user_to_domain(m: user::Model) -> User {
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

fn txn_err(e: TransactionError<DomainError>) -> DomainError {
    match e {
        TransactionError::Connection(db) => db.into(),
        TransactionError::Transaction(domain) => domain,
    }
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, new: NewReservation) -> DomainResult<Reservation> {
        debug!(
            user_id = new.user_id,
            station_id = new.station_id,
            "inserting reservation"
        );

        let model = reservation::ActiveModel {
            user_id: Set(new.user_id),
            station_id: Set(new.station_id),
            date: Set(new.date),
            hour: Set(new.hour),
            is_green: Set(new.is_green),
            earned_coins: Set(new.earned_coins),
            saved_co2: Set(0.0),
            status: Set(ReservationStatus::Pending.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(
        &self,
        id: i32,
        status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        let existing = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("Reservation"))?;

        let mut active: reservation::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        let updated = active.update(&self.db).await?;
        Ok(model_to_domain(updated))
    }

    async fn complete(
        &self,
        id: i32,
        co2_delta: f64,
        xp_delta: i32,
    ) -> DomainResult<(Reservation, User)> {
        let result = self
            .db
            .transaction::<_, (Reservation, User), DomainError>(move |txn| {
                Box::pin(async move {
                    let existing = reservation::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(DomainError::not_found("Reservation"))?;

                    // The guard lives inside the transaction; a concurrent
                    // settle of the same reservation loses here.
                    if existing.status == ReservationStatus::Completed.as_str() {
                        return Err(DomainError::AlreadyCompleted);
                    }

                    let user_id = existing.user_id;
                    let earned_coins = existing.earned_coins;

                    let mut active: reservation::ActiveModel = existing.into();
                    active.status = Set(ReservationStatus::Completed.as_str().to_string());
                    active.saved_co2 = Set(co2_delta);
                    let settled = active.update(txn).await?;

                    let owner = user::Entity::find_by_id(user_id)
                        .one(txn)
                        .await?
                        .ok_or(DomainError::not_found("User"))?;

                    let mut owner_active: user::ActiveModel = owner.clone().into();
                    owner_active.coins = Set(owner.coins + earned_coins);
                    owner_active.co2_saved = Set(owner.co2_saved + co2_delta);
                    owner_active.xp = Set(owner.xp + xp_delta);
                    let credited = owner_active.update(txn).await?;

                    Ok((model_to_domain(settled), user_to_domain(credited)))
                })
            })
            .await
            .map_err(txn_err)?;
        Ok(result)
    }

    async fn station_stats(&self, station_id: i32) -> DomainResult<ReservationStats> {
        let total = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id))
            .count(&self.db)
            .await?;
        let green = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id))
            .filter(reservation::Column::IsGreen.eq(true))
            .count(&self.db)
            .await?;
        let completed = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Completed.as_str()))
            .count(&self.db)
            .await?;

        Ok(ReservationStats {
            total: total as i64,
            green: green as i64,
            completed: completed as i64,
        })
    }

    async fn exists_for_station(&self, station_id: i32) -> DomainResult<bool> {
        let count = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
