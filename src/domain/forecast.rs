//! Forecast domain types

/// Hours in a week: 7 days × 24 hours, one forecast entry per slot.
pub const SLOTS_PER_WEEK: usize = 168;

/// Predicted load for one weekly slot of one station.
///
/// `day_of_week` uses the 0=Monday .. 6=Sunday convention throughout the
/// system. `predicted_load` is clamped to [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastEntry {
    pub station_id: i32,
    pub day_of_week: u8,
    pub hour: u8,
    pub predicted_load: i32,
}

/// Convert a chrono weekday into the 0=Monday convention.
pub fn day_of_week(weekday: chrono::Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn monday_is_zero() {
        assert_eq!(day_of_week(Weekday::Mon), 0);
        assert_eq!(day_of_week(Weekday::Sat), 5);
        assert_eq!(day_of_week(Weekday::Sun), 6);
    }
}
