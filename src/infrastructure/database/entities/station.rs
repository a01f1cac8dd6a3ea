//! Station entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub lat: f64,
    pub lng: f64,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    /// Base price per kWh before discounts
    pub price: f64,

    /// Cached occupancy snapshot, mean of the weekly forecast
    pub density: i32,

    /// Synthetic load archetype: central, suburban, outskirt
    pub density_profile: String,

    #[sea_orm(nullable)]
    pub owner_id: Option<i32>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::station_forecast::Entity")]
    Forecasts,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::station_forecast::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forecasts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
