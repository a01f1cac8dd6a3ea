//! Station API DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::pricing::SlotDescriptor;
use crate::application::stations::{
    AggregateStats, OperatorDashboard, StationDetail, StationForecast, StationListItem,
    StationSummary,
};
use crate::domain::campaign::Campaign;
use crate::domain::station::Station;

/// Station as returned by list and detail endpoints
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    pub price: f64,
    pub density: i32,
    pub density_profile: String,
}

impl From<Station> for StationDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            lat: s.lat,
            lng: s.lng,
            address: s.address,
            price: s.price,
            density: s.density,
            density_profile: s.density_profile.as_str().to_string(),
        }
    }
}

/// Station list entry with its load status for the map view
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationListItemDto {
    #[serde(flatten)]
    pub station: StationDto,
    /// GREEN, YELLOW or RED by cached density
    pub status: String,
    pub owner_name: Option<String>,
    pub next_green_hour: String,
}

impl From<StationListItem> for StationListItemDto {
    fn from(item: StationListItem) -> Self {
        Self {
            status: item.status.as_str().to_string(),
            owner_name: item.owner_name,
            next_green_hour: item.next_green_hour.to_string(),
            station: item.station.into(),
        }
    }
}

/// Campaign summary embedded in slots and station detail
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummaryDto {
    pub id: i32,
    pub title: String,
    pub discount: String,
    pub coin_reward: i32,
}

impl From<Campaign> for CampaignSummaryDto {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title,
            discount: c.discount,
            coin_reward: c.coin_reward,
        }
    }
}

/// One bookable hour of a station day
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub hour: u8,
    pub label: String,
    pub start_time: DateTime<Utc>,
    pub is_green: bool,
    pub coins: i32,
    pub price: f64,
    /// GREEN for green-window hours, RED otherwise
    pub status: String,
    pub load: i32,
    pub campaign_title: Option<String>,
    pub campaign_discount: Option<String>,
}

impl From<SlotDescriptor> for SlotDto {
    fn from(s: SlotDescriptor) -> Self {
        let (campaign_title, campaign_discount) = match s.campaign {
            Some(c) => (Some(c.title), Some(c.discount)),
            None => (None, None),
        };
        Self {
            hour: s.hour,
            label: s.label,
            start_time: s.start_time,
            is_green: s.is_green,
            coins: s.coins,
            price: s.price,
            status: s.status.as_str().to_string(),
            load: s.load,
            campaign_title,
            campaign_discount,
        }
    }
}

/// Station detail with the day's 24 priced slots
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationDetailDto {
    #[serde(flatten)]
    pub station: StationDto,
    pub active_campaign: Option<CampaignSummaryDto>,
    pub slots: Vec<SlotDto>,
}

impl From<StationDetail> for StationDetailDto {
    fn from(d: StationDetail) -> Self {
        Self {
            station: d.station.into(),
            active_campaign: d.active_campaign.map(Into::into),
            slots: d.slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// One station's predicted load at a weekly slot
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationForecastDto {
    #[serde(flatten)]
    pub station: StationDto,
    pub predicted_load: i32,
}

impl From<StationForecast> for StationForecastDto {
    fn from(f: StationForecast) -> Self {
        Self {
            station: f.station.into(),
            predicted_load: f.predicted_load,
        }
    }
}

/// Per-station dashboard numbers
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationSummaryDto {
    #[serde(flatten)]
    pub station: StationDto,
    pub status: String,
    pub reservation_count: i64,
    pub green_reservation_count: i64,
    pub revenue: f64,
}

impl From<StationSummary> for StationSummaryDto {
    fn from(s: StationSummary) -> Self {
        Self {
            status: s.status.as_str().to_string(),
            reservation_count: s.reservation_count,
            green_reservation_count: s.green_reservation_count,
            revenue: s.revenue,
            station: s.station.into(),
        }
    }
}

/// Operator dashboard aggregates
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatsDto {
    pub total_revenue: f64,
    pub total_reservations: i64,
    pub green_share: f64,
    pub avg_load: i32,
}

impl From<AggregateStats> for AggregateStatsDto {
    fn from(s: AggregateStats) -> Self {
        Self {
            total_revenue: s.total_revenue,
            total_reservations: s.total_reservations,
            green_share: s.green_share,
            avg_load: s.avg_load,
        }
    }
}

/// Operator dashboard payload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDashboardDto {
    pub stats: AggregateStatsDto,
    pub stations: Vec<StationSummaryDto>,
}

impl From<OperatorDashboard> for OperatorDashboardDto {
    fn from(d: OperatorDashboard) -> Self {
        Self {
            stats: d.stats.into(),
            stations: d.stations.into_iter().map(Into::into).collect(),
        }
    }
}
