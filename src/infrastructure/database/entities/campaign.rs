//! Campaign entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,

    /// Campaign status: ACTIVE, INACTIVE
    pub status: String,

    pub target: String,

    /// Display string; "%20" style values feed price stacking
    pub discount: String,

    #[sea_orm(nullable)]
    pub end_date: Option<DateTimeUtc>,

    pub owner_id: i32,

    /// NULL applies the campaign to every station
    #[sea_orm(nullable)]
    pub station_id: Option<i32>,

    pub coin_reward: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    #[sea_orm(has_many = "super::campaign_target_badge::Entity")]
    TargetBadges,
}

impl Related<super::campaign_target_badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetBadges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
