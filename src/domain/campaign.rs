//! Campaign domain entity, discount parsing and the active-campaign
//! selection policy

use chrono::{DateTime, Utc};

/// Campaign status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    Active,
    Inactive,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Promotional campaign.
///
/// `station_id = None` means the campaign applies to all stations. The
/// `discount` field is a display string: a percentage form like "%20"
/// participates in price stacking, any other label ("2x Coin",
/// "first hour free") is informational only.
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    /// Audience description shown to operators
    pub target: String,
    pub discount: String,
    /// None = no expiry
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: i32,
    /// None = global campaign
    pub station_id: Option<i32>,
    /// Coins added to every reservation made under this campaign
    pub coin_reward: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Parse the discount string into a fractional rate.
    ///
    /// "%20" → Some(0.20). Non-numeric promotional labels return None and
    /// take no part in price arithmetic.
    pub fn discount_rate(&self) -> Option<f64> {
        let cleaned = self.discount.replace('%', "");
        let cleaned = cleaned.trim();
        let val: f64 = cleaned.parse().ok()?;
        if val > 0.0 {
            Some(val / 100.0)
        } else {
            None
        }
    }

    /// Whether this campaign currently applies to the given station.
    pub fn applies_to(&self, station_id: i32, now: DateTime<Utc>) -> bool {
        if self.status != CampaignStatus::Active {
            return false;
        }
        if let Some(end) = self.end_date {
            if end <= now {
                return false;
            }
        }
        match self.station_id {
            Some(sid) => sid == station_id,
            None => true,
        }
    }
}

/// Resolve the single active campaign for a station.
///
/// Selection policy, stated explicitly rather than left to query ordering:
/// station-specific campaigns beat global ones, then the most recently
/// created wins. At most one campaign's effects ever apply to a slot.
pub fn select_active(
    campaigns: &[Campaign],
    station_id: i32,
    now: DateTime<Utc>,
) -> Option<&Campaign> {
    campaigns
        .iter()
        .filter(|c| c.applies_to(station_id, now))
        .max_by_key(|c| (c.station_id.is_some(), c.created_at))
}

/// Fields for creating a new campaign
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    pub target: String,
    pub discount: String,
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: i32,
    pub station_id: Option<i32>,
    pub coin_reward: i32,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn campaign(id: i32, station_id: Option<i32>, created_offset_mins: i64) -> Campaign {
        Campaign {
            id,
            title: format!("Campaign {}", id),
            description: String::new(),
            status: CampaignStatus::Active,
            target: String::new(),
            discount: "%20".to_string(),
            end_date: None,
            owner_id: 1,
            station_id,
            coin_reward: 0,
            created_at: Utc::now() + Duration::minutes(created_offset_mins),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parses_percentage_discount() {
        let c = campaign(1, None, 0);
        assert_eq!(c.discount_rate(), Some(0.20));
    }

    #[test]
    fn non_numeric_discount_has_no_rate() {
        let mut c = campaign(1, None, 0);
        c.discount = "2x Coin".to_string();
        assert_eq!(c.discount_rate(), None);

        c.discount = "İlk saat ücretsiz".to_string();
        assert_eq!(c.discount_rate(), None);
    }

    #[test]
    fn percentage_with_whitespace_parses() {
        let mut c = campaign(1, None, 0);
        c.discount = "% 15".to_string();
        assert_eq!(c.discount_rate(), Some(0.15));
    }

    #[test]
    fn station_specific_beats_global() {
        let global = campaign(1, None, 10); // newer
        let specific = campaign(2, Some(7), 0); // older but scoped
        let pool = vec![global, specific];

        let picked = select_active(&pool, 7, Utc::now()).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn most_recent_wins_within_same_scope() {
        let older = campaign(1, None, 0);
        let newer = campaign(2, None, 5);
        let pool = vec![older, newer];

        let picked = select_active(&pool, 1, Utc::now()).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn expired_and_inactive_are_skipped() {
        let mut expired = campaign(1, None, 0);
        expired.end_date = Some(Utc::now() - Duration::days(1));

        let mut inactive = campaign(2, None, 0);
        inactive.status = CampaignStatus::Inactive;

        let pool = vec![expired, inactive];
        assert!(select_active(&pool, 1, Utc::now()).is_none());
    }

    #[test]
    fn foreign_station_campaign_does_not_apply() {
        let other = campaign(1, Some(3), 0);
        let pool = vec![other];
        assert!(select_active(&pool, 7, Utc::now()).is_none());
    }

    #[test]
    fn no_expiry_means_no_expiry() {
        let c = campaign(1, None, 0);
        assert!(c.applies_to(1, Utc::now() + Duration::days(3650)));
    }
}
