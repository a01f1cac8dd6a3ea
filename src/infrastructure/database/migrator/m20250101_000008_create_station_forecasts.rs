//! Create station_density_forecasts table
//!
//! One row per station per (day_of_week, hour) weekly slot; the forecast
//! refresh upserts on that unique key.

use sea_orm_migration::prelude::*;

use super::m20250101_000004_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StationDensityForecasts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StationDensityForecasts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StationDensityForecasts::StationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationDensityForecasts::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationDensityForecasts::Hour)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationDensityForecasts::PredictedLoad)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_forecasts_station")
                            .from(
                                StationDensityForecasts::Table,
                                StationDensityForecasts::StationId,
                            )
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_station_forecasts_slot")
                    .table(StationDensityForecasts::Table)
                    .col(StationDensityForecasts::StationId)
                    .col(StationDensityForecasts::DayOfWeek)
                    .col(StationDensityForecasts::Hour)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(StationDensityForecasts::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum StationDensityForecasts {
    Table,
    Id,
    StationId,
    DayOfWeek,
    Hour,
    PredictedLoad,
}
