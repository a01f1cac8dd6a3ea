//! Slot pricing engine
//!
//! Computes the 24 hourly slot descriptors of a station's day: price after
//! green-hour and campaign discounts, coin reward, forecast-driven load and
//! the binary per-slot display status. Pure computation; the station
//! service feeds it forecast loads and the selected campaign.

use chrono::{DateTime, Duration, Utc};

use crate::domain::campaign::Campaign;
use crate::domain::reservation::base_coins;
use crate::domain::station::{is_green_hour, LoadStatus, Station};

/// Multiplier applied to the base price inside the green window.
pub const GREEN_DISCOUNT: f64 = 0.8;

/// Campaign summary attached to the slots it affected.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCampaign {
    pub title: String,
    pub discount: String,
}

/// One bookable hour of a station's day.
#[derive(Debug, Clone)]
pub struct SlotDescriptor {
    pub hour: u8,
    /// "%02d:00" display label
    pub label: String,
    pub start_time: DateTime<Utc>,
    pub is_green: bool,
    pub coins: i32,
    /// Final price, rounded to 2 decimals for display
    pub price: f64,
    /// Binary display status: green hours are GREEN, everything else RED.
    /// Deliberately distinct from `classify_load`; call sites depend on
    /// each rule independently.
    pub status: LoadStatus,
    pub load: i32,
    pub campaign: Option<SlotCampaign>,
}

/// Round a price to 2 decimal places for display.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the 24 slot descriptors for one station day.
///
/// `hourly_loads[h]` is the forecast for hour `h` of the current day of
/// week; a missing entry falls back to the station's cached density.
/// Discounts compose multiplicatively: green first, then the campaign's
/// percentage rate on the already-discounted price. Intermediate values
/// stay unrounded; only the final price is display-rounded.
pub fn compute_day_slots(
    station: &Station,
    campaign: Option<&Campaign>,
    hourly_loads: &[Option<i32>; 24],
    day_start: DateTime<Utc>,
) -> Vec<SlotDescriptor> {
    let discount_rate = campaign.and_then(|c| c.discount_rate());

    (0..24u8)
        .map(|hour| {
            let green = is_green_hour(hour);

            let mut price = station.price;
            if green {
                price *= GREEN_DISCOUNT;
            }
            if let Some(rate) = discount_rate {
                price *= 1.0 - rate;
            }

            let mut coins = base_coins(green);
            if let Some(c) = campaign {
                if c.coin_reward > 0 {
                    coins += c.coin_reward;
                }
            }

            let load = hourly_loads[hour as usize].unwrap_or(station.density);

            SlotDescriptor {
                hour,
                label: format!("{:02}:00", hour),
                start_time: day_start + Duration::hours(hour as i64),
                is_green: green,
                coins,
                price: round_price(price),
                status: if green { LoadStatus::Green } else { LoadStatus::Red },
                load,
                campaign: campaign.map(|c| SlotCampaign {
                    title: c.title.clone(),
                    discount: c.discount.clone(),
                }),
            }
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::campaign::CampaignStatus;
    use crate::domain::station::DensityProfile;

    fn station(price: f64, density: i32) -> Station {
        Station {
            id: 1,
            name: "Test".to_string(),
            lat: 38.6,
            lng: 27.4,
            address: None,
            price,
            density,
            density_profile: DensityProfile::Central,
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    fn campaign(discount: &str, coin_reward: i32) -> Campaign {
        Campaign {
            id: 1,
            title: "Promo".to_string(),
            description: String::new(),
            status: CampaignStatus::Active,
            target: String::new(),
            discount: discount.to_string(),
            end_date: None,
            owner_id: 1,
            station_id: None,
            coin_reward,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn no_forecast() -> [Option<i32>; 24] {
        [None; 24]
    }

    #[test]
    fn returns_24_ordered_slots() {
        let slots = compute_day_slots(&station(8.0, 40), None, &no_forecast(), Utc::now());
        assert_eq!(slots.len(), 24);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.hour as usize, i);
            assert!(slot.price >= 0.0);
            assert!(slot.coins >= 10);
        }
    }

    #[test]
    fn green_hours_get_discount_and_big_coins() {
        let slots = compute_day_slots(&station(10.0, 40), None, &no_forecast(), Utc::now());

        let night = &slots[23];
        assert!(night.is_green);
        assert_eq!(night.price, 8.0);
        assert_eq!(night.coins, 50);
        assert_eq!(night.status, LoadStatus::Green);

        let noon = &slots[12];
        assert!(!noon.is_green);
        assert_eq!(noon.price, 10.0);
        assert_eq!(noon.coins, 10);
        assert_eq!(noon.status, LoadStatus::Red);
    }

    #[test]
    fn discounts_compose_multiplicatively() {
        let promo = campaign("%20", 0);
        let slots = compute_day_slots(&station(10.0, 40), Some(&promo), &no_forecast(), Utc::now());

        // Green: 10 × 0.8 × 0.8 = 6.40, not 10 × (1 − 0.4)
        assert_eq!(slots[0].price, 6.4);
        // Non-green: 10 × 0.8 = 8.00
        assert_eq!(slots[12].price, 8.0);
    }

    #[test]
    fn price_formula_rounds_to_two_decimals() {
        let promo = campaign("%15", 0);
        let base = 7.77;
        let slots = compute_day_slots(&station(base, 40), Some(&promo), &no_forecast(), Utc::now());

        for slot in &slots {
            let expected = base * if slot.is_green { 0.8 } else { 1.0 } * 0.85;
            assert_eq!(slot.price, round_price(expected));
        }
    }

    #[test]
    fn campaign_coins_stack_on_top_of_base() {
        let promo = campaign("2x Coin", 200);
        let slots = compute_day_slots(&station(10.0, 40), Some(&promo), &no_forecast(), Utc::now());

        assert_eq!(slots[23].coins, 250); // 50 + 200
        assert_eq!(slots[12].coins, 210); // 10 + 200
        // Non-numeric discount label leaves the price alone.
        assert_eq!(slots[12].price, 10.0);
    }

    #[test]
    fn zero_coin_reward_is_not_added() {
        let promo = campaign("%10", 0);
        let slots = compute_day_slots(&station(10.0, 40), Some(&promo), &no_forecast(), Utc::now());
        assert_eq!(slots[12].coins, 10);
    }

    #[test]
    fn forecast_load_with_density_fallback() {
        let mut loads = no_forecast();
        loads[8] = Some(91);

        let slots = compute_day_slots(&station(10.0, 37), None, &loads, Utc::now());
        assert_eq!(slots[8].load, 91);
        assert_eq!(slots[9].load, 37); // fallback to cached density
    }

    #[test]
    fn slot_carries_campaign_summary() {
        let promo = campaign("%20", 50);
        let slots = compute_day_slots(&station(10.0, 40), Some(&promo), &no_forecast(), Utc::now());
        let applied = slots[0].campaign.as_ref().unwrap();
        assert_eq!(applied.title, "Promo");
        assert_eq!(applied.discount, "%20");
    }

    #[test]
    fn label_and_start_time_follow_the_hour() {
        let day_start = chrono::DateTime::parse_from_rfc3339("2026-01-05T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let slots = compute_day_slots(&station(10.0, 40), None, &no_forecast(), day_start);

        assert_eq!(slots[5].label, "05:00");
        assert_eq!(slots[5].start_time, day_start + Duration::hours(5));
    }
}
