//! Station domain entity and load classification rules

use chrono::{DateTime, Utc};

/// First hour of the discounted green window (inclusive).
pub const GREEN_START_HOUR: u8 = 23;
/// Last hour of the discounted green window (inclusive).
pub const GREEN_END_HOUR: u8 = 6;

/// Three-tier congestion status derived from a load value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Green,
    Yellow,
    Red,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a load value in [0,100] into the three-tier status used by the
/// station list and the operator dashboard. Thresholds are strictly
/// greater-than: 45 is still GREEN, 65 is still YELLOW.
pub fn classify_load(load: i32) -> LoadStatus {
    if load > 65 {
        LoadStatus::Red
    } else if load > 45 {
        LoadStatus::Yellow
    } else {
        LoadStatus::Green
    }
}

/// Whether an hour falls inside the green window.
///
/// The window wraps around midnight and is inclusive on both ends, so it
/// covers hours 23, 0, 1, 2, 3, 4, 5 and 6: eight hours, one more than
/// the "23:00–06:00" label suggests. This matches the deployed behavior
/// and is kept as-is.
pub fn is_green_hour(hour: u8) -> bool {
    hour >= GREEN_START_HOUR || hour <= GREEN_END_HOUR
}

/// Behavioral archetype driving synthetic load generation for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DensityProfile {
    /// City-center station with pronounced commute peaks
    Central,
    /// Residential-area station with moderate peaks
    Suburban,
    /// Low-traffic station on the outskirts
    Outskirt,
}

impl DensityProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Suburban => "suburban",
            Self::Outskirt => "outskirt",
        }
    }

    /// Parse a stored profile tag. Unknown tags map to the middle-of-the-road
    /// suburban archetype rather than failing a read path.
    pub fn from_str(s: &str) -> Self {
        match s {
            "central" => Self::Central,
            "outskirt" => Self::Outskirt,
            _ => Self::Suburban,
        }
    }
}

impl std::fmt::Display for DensityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Charging station
#[derive(Debug, Clone)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    /// Base hourly price before any discount
    pub price: f64,
    /// Cached aggregate congestion snapshot in [0,100],
    /// recomputed from the forecast on refresh
    pub density: i32,
    pub density_profile: DensityProfile,
    pub owner_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new station
#[derive(Debug, Clone)]
pub struct NewStation {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    pub price: f64,
    pub density: i32,
    pub density_profile: DensityProfile,
    pub owner_id: Option<i32>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_load_boundaries() {
        assert_eq!(classify_load(0), LoadStatus::Green);
        assert_eq!(classify_load(45), LoadStatus::Green);
        assert_eq!(classify_load(46), LoadStatus::Yellow);
        assert_eq!(classify_load(65), LoadStatus::Yellow);
        assert_eq!(classify_load(66), LoadStatus::Red);
        assert_eq!(classify_load(100), LoadStatus::Red);
    }

    #[test]
    fn green_window_spans_eight_hours() {
        // Documented behavior: both boundary hours are inclusive.
        let green: Vec<u8> = (0u8..24).filter(|&h| is_green_hour(h)).collect();
        assert_eq!(green, vec![0, 1, 2, 3, 4, 5, 6, 23]);
    }

    #[test]
    fn midday_is_not_green() {
        assert!(!is_green_hour(7));
        assert!(!is_green_hour(12));
        assert!(!is_green_hour(22));
    }

    #[test]
    fn profile_tag_roundtrip() {
        for p in [
            DensityProfile::Central,
            DensityProfile::Suburban,
            DensityProfile::Outskirt,
        ] {
            assert_eq!(DensityProfile::from_str(p.as_str()), p);
        }
    }

    #[test]
    fn unknown_profile_defaults_to_suburban() {
        assert_eq!(DensityProfile::from_str("flat"), DensityProfile::Suburban);
    }
}
