//! SeaORM implementation of ForecastRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::forecast::ForecastEntry;
use crate::domain::{DomainResult, ForecastRepository};
use crate::infrastructure::database::entities::station_forecast;

pub struct SeaOrmForecastRepository {
    db: DatabaseConnection,
}

impl SeaOrmForecastRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: station_forecast::Model) -> ForecastEntry {
    ForecastEntry {
        station_id: m.station_id,
        day_of_week: m.day_of_week as u8,
        hour: m.hour as u8,
        predicted_load: m.predicted_load,
    }
}

#[async_trait]
impl ForecastRepository for SeaOrmForecastRepository {
    async fn upsert_many(&self, entries: &[ForecastEntry]) -> DomainResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let models: Vec<station_forecast::ActiveModel> = entries
            .iter()
            .map(|e| station_forecast::ActiveModel {
                station_id: Set(e.station_id),
                day_of_week: Set(e.day_of_week as i32),
                hour: Set(e.hour as i32),
                predicted_load: Set(e.predicted_load),
                ..Default::default()
            })
            .collect();

        station_forecast::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    station_forecast::Column::StationId,
                    station_forecast::Column::DayOfWeek,
                    station_forecast::Column::Hour,
                ])
                .update_column(station_forecast::Column::PredictedLoad)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn find_for_station_day(
        &self,
        station_id: i32,
        day_of_week: u8,
    ) -> DomainResult<Vec<ForecastEntry>> {
        let models = station_forecast::Entity::find()
            .filter(station_forecast::Column::StationId.eq(station_id))
            .filter(station_forecast::Column::DayOfWeek.eq(day_of_week as i32))
            .order_by_asc(station_forecast::Column::Hour)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_day_hour(
        &self,
        day_of_week: u8,
        hour: u8,
    ) -> DomainResult<Vec<ForecastEntry>> {
        let models = station_forecast::Entity::find()
            .filter(station_forecast::Column::DayOfWeek.eq(day_of_week as i32))
            .filter(station_forecast::Column::Hour.eq(hour as i32))
            .order_by_asc(station_forecast::Column::StationId)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
