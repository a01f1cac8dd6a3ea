//! Campaign API DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::campaigns::{CampaignForUser, CampaignWithBadges};
use crate::domain::campaign::Campaign;

use super::user::BadgeDto;

/// Campaign as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// ACTIVE or INACTIVE
    pub status: String,
    pub target: String,
    pub discount: String,
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: i32,
    pub station_id: Option<i32>,
    pub coin_reward: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignDto {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            status: c.status.as_str().to_string(),
            target: c.target,
            discount: c.discount,
            end_date: c.end_date,
            owner_id: c.owner_id,
            station_id: c.station_id,
            coin_reward: c.coin_reward,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Campaign with resolved station name and target badges (operator view)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWithBadgesDto {
    #[serde(flatten)]
    pub campaign: CampaignDto,
    pub station_name: Option<String>,
    pub target_badges: Vec<BadgeDto>,
}

impl From<CampaignWithBadges> for CampaignWithBadgesDto {
    fn from(c: CampaignWithBadges) -> Self {
        Self {
            campaign: c.campaign.into(),
            station_name: c.station_name,
            target_badges: c.target_badges.into_iter().map(Into::into).collect(),
        }
    }
}

/// Campaign feed entry for drivers with their matched target badges
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignForUserDto {
    #[serde(flatten)]
    pub campaign: CampaignDto,
    pub target_badges: Vec<BadgeDto>,
    pub matched_badges: Vec<BadgeDto>,
}

impl From<CampaignForUser> for CampaignForUserDto {
    fn from(c: CampaignForUser) -> Self {
        Self {
            campaign: c.campaign.into(),
            target_badges: c.target_badges.into_iter().map(Into::into).collect(),
            matched_badges: c.matched_badges.into_iter().map(Into::into).collect(),
        }
    }
}
