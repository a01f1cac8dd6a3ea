//! Station load forecast builder
//!
//! Synthesizes a multi-week history of hourly occupancy samples from a
//! station's density profile, then fits one ordinary least-squares linear
//! regression per (day-of-week, hour) bucket (168 in total) and predicts
//! each slot's next occurrence. The randomness source is injected so a
//! seeded RNG yields reproducible forecasts.

use std::collections::HashMap;

use rand::Rng;

use crate::domain::station::DensityProfile;

/// Tunables of one density profile archetype.
#[derive(Debug, Clone, Copy)]
pub struct ProfileConfig {
    /// Baseline occupancy in [0,100]
    pub base_load: f64,
    /// Multiplier applied during weekday commute peaks
    pub peak_multiplier: f64,
    /// Total width of the uniform noise band
    pub variance: f64,
}

/// Immutable profile lookup passed to the builder at construction time,
/// so tests can substitute alternate catalogs.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: HashMap<DensityProfile, ProfileConfig>,
}

impl ProfileCatalog {
    pub fn new(profiles: HashMap<DensityProfile, ProfileConfig>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, profile: DensityProfile) -> ProfileConfig {
        self.profiles
            .get(&profile)
            .copied()
            .unwrap_or(ProfileConfig {
                base_load: 35.0,
                peak_multiplier: 1.5,
                variance: 12.0,
            })
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            DensityProfile::Central,
            ProfileConfig { base_load: 50.0, peak_multiplier: 1.8, variance: 15.0 },
        );
        profiles.insert(
            DensityProfile::Suburban,
            ProfileConfig { base_load: 35.0, peak_multiplier: 1.5, variance: 12.0 },
        );
        profiles.insert(
            DensityProfile::Outskirt,
            ProfileConfig { base_load: 20.0, peak_multiplier: 1.3, variance: 8.0 },
        );
        Self { profiles }
    }
}

/// One predicted weekly slot, before a station id is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyForecast {
    pub day_of_week: u8,
    pub hour: u8,
    pub predicted_load: i32,
}

/// One synthesized hourly occupancy sample.
#[derive(Debug, Clone, Copy)]
struct SamplePoint {
    day_of_week: u8,
    hour: u8,
    load: f64,
}

/// Builds per-station weekly load forecasts from synthetic history.
#[derive(Debug, Clone)]
pub struct ForecastModelBuilder {
    catalog: ProfileCatalog,
    history_days: usize,
}

impl ForecastModelBuilder {
    pub fn new(catalog: ProfileCatalog) -> Self {
        Self { catalog, history_days: 60 }
    }

    /// Override the synthesized history length (default 60 days).
    pub fn with_history_days(mut self, days: usize) -> Self {
        self.history_days = days;
        self
    }

    /// Build the weekly forecast for one station.
    ///
    /// Buckets with a single sample predict that sample; buckets the
    /// shortened history never filled emit no entry at all (readers fall
    /// back to the station's cached density).
    pub fn build<R: Rng>(&self, profile: DensityProfile, rng: &mut R) -> Vec<WeeklyForecast> {
        let samples = self.synthesize_history(profile, rng);

        // Group by (day_of_week, hour), preserving generation order so the
        // sample index doubles as the regression x value.
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); 7 * 24];
        for s in &samples {
            buckets[s.day_of_week as usize * 24 + s.hour as usize].push(s.load);
        }

        let mut forecasts = Vec::with_capacity(buckets.len());
        for day_of_week in 0..7u8 {
            for hour in 0..24u8 {
                let bucket = &buckets[day_of_week as usize * 24 + hour as usize];
                if bucket.is_empty() {
                    continue;
                }
                let predicted = predict_next(bucket).clamp(0.0, 100.0).round() as i32;
                forecasts.push(WeeklyForecast { day_of_week, hour, predicted_load: predicted });
            }
        }
        forecasts
    }

    /// Synthesize `history_days` × 24 hourly samples for a profile.
    fn synthesize_history<R: Rng>(&self, profile: DensityProfile, rng: &mut R) -> Vec<SamplePoint> {
        let cfg = self.catalog.get(profile);
        let mut samples = Vec::with_capacity(self.history_days * 24);

        // Long-term drift direction is fixed once per station: some stations
        // grow more popular over the window, others decline.
        let drift_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        for day in 0..self.history_days {
            let day_of_week = (day % 7) as u8;
            let is_weekend = day_of_week >= 5;

            for hour in 0..24u8 {
                let mut load = cfg.base_load;

                if (7..=9).contains(&hour) {
                    // Morning commute
                    load *= if is_weekend { 1.1 } else { cfg.peak_multiplier };
                } else if (12..=14).contains(&hour) {
                    // Lunch
                    load *= 1.3;
                } else if (17..=20).contains(&hour) {
                    // Evening commute
                    load *= if is_weekend { 1.2 } else { cfg.peak_multiplier };
                } else if hour >= 22 || hour < 6 {
                    // Night
                    load *= 0.4;
                }

                if is_weekend {
                    load *= 0.85;
                }

                // Uniform noise in [-variance/2, +variance/2]
                let noise = (rng.gen::<f64>() - 0.5) * cfg.variance;
                load = (load + noise).clamp(0.0, 100.0);

                // Drift grows linearly with the day index, ±10% at the end
                // of the window.
                let trend = 1.0 + (day as f64 / self.history_days as f64) * 0.1 * drift_sign;
                load = (load * trend).clamp(0.0, 100.0);

                samples.push(SamplePoint { day_of_week, hour, load: load.round() });
            }
        }
        samples
    }
}

impl Default for ForecastModelBuilder {
    fn default() -> Self {
        Self::new(ProfileCatalog::default())
    }
}

/// Predict the next value of a sample sequence via OLS linear regression.
///
/// The independent variable is the sample's 0-based position within the
/// bucket; the prediction is taken one step beyond the observed sequence,
/// at x = n. Fewer than two samples, or a degenerate denominator, fall
/// back to the arithmetic mean. The caller guards against empty input.
pub fn predict_next(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    if samples.len() < 2 {
        return mean;
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in samples.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return mean;
    }

    let m = (n * sum_xy - sum_x * sum_y) / denom;
    let b = (sum_y - m * sum_x) / n;
    m * n + b
}

/// Rounded mean of all predicted loads; the station's cached density is
/// recomputed to this after every refresh. Defaults to 50 when the
/// forecast set is empty.
pub fn average_density(forecasts: &[WeeklyForecast]) -> i32 {
    if forecasts.is_empty() {
        return 50;
    }
    let sum: i64 = forecasts.iter().map(|f| f.predicted_load as i64).sum();
    (sum as f64 / forecasts.len() as f64).round() as i32
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn regression_extends_linear_sequence() {
        // slope 10, intercept 10 → prediction at x=3 is 40
        let predicted = predict_next(&[10.0, 20.0, 30.0]);
        assert!((predicted - 40.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_predicts_itself() {
        assert_eq!(predict_next(&[42.0]), 42.0);
    }

    #[test]
    fn constant_sequence_predicts_the_constant() {
        let predicted = predict_next(&[55.0, 55.0, 55.0, 55.0]);
        assert!((predicted - 55.0).abs() < 1e-9);
    }

    #[test]
    fn build_emits_all_168_slots() {
        let builder = ForecastModelBuilder::default();
        let mut rng = StdRng::seed_from_u64(7);
        let forecasts = builder.build(DensityProfile::Central, &mut rng);

        assert_eq!(forecasts.len(), 168);
        for f in &forecasts {
            assert!(f.day_of_week < 7);
            assert!(f.hour < 24);
            assert!((0..=100).contains(&f.predicted_load));
        }

        // Every (day_of_week, hour) pair exactly once, ordered.
        let slots: Vec<(u8, u8)> = forecasts.iter().map(|f| (f.day_of_week, f.hour)).collect();
        let mut expected = Vec::new();
        for d in 0..7u8 {
            for h in 0..24u8 {
                expected.push((d, h));
            }
        }
        assert_eq!(slots, expected);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let builder = ForecastModelBuilder::default();
        let a = builder.build(DensityProfile::Suburban, &mut StdRng::seed_from_u64(99));
        let b = builder.build(DensityProfile::Suburban, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn short_history_leaves_unseen_slots_empty() {
        // 3 days of history only ever fills Monday..Wednesday buckets.
        let builder = ForecastModelBuilder::default().with_history_days(3);
        let mut rng = StdRng::seed_from_u64(1);
        let forecasts = builder.build(DensityProfile::Outskirt, &mut rng);

        assert_eq!(forecasts.len(), 3 * 24);
        assert!(forecasts.iter().all(|f| f.day_of_week <= 2));
    }

    #[test]
    fn substitute_catalog_is_honored() {
        let mut profiles = HashMap::new();
        profiles.insert(
            DensityProfile::Outskirt,
            ProfileConfig { base_load: 20.0, peak_multiplier: 1.3, variance: 0.0 },
        );
        let builder = ForecastModelBuilder::new(ProfileCatalog::new(profiles));
        let mut rng = StdRng::seed_from_u64(5);
        let forecasts = builder.build(DensityProfile::Outskirt, &mut rng);

        // Noise-free lunch slot on a weekday: 20 × 1.3 = 26, drifted by at
        // most ±10%.
        let lunch = forecasts
            .iter()
            .find(|f| f.day_of_week == 0 && f.hour == 13)
            .unwrap();
        assert!((23..=29).contains(&lunch.predicted_load), "got {}", lunch.predicted_load);
    }

    #[test]
    fn average_density_is_rounded_mean() {
        let forecasts = vec![
            WeeklyForecast { day_of_week: 0, hour: 0, predicted_load: 10 },
            WeeklyForecast { day_of_week: 0, hour: 1, predicted_load: 21 },
        ];
        assert_eq!(average_density(&forecasts), 16); // 15.5 rounds up
        assert_eq!(average_density(&[]), 50);
    }
}
