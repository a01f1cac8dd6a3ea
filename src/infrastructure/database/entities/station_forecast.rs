//! Station density forecast entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One predicted weekly slot. Unique per (station_id, day_of_week, hour);
/// the forecast refresh upserts on that key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "station_density_forecasts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub station_id: i32,

    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i32,

    /// 0-23
    pub hour: i32,

    /// Predicted occupancy in [0,100]
    pub predicted_load: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
