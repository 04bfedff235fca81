/// Debris composition prediction: land use + current weather → percentage
/// breakdown by material category.

use std::collections::BTreeMap;

use crate::config::{CompositionAdjustments, CompositionProfiles};
use crate::model::{DebrisCategory, LandUse, WeatherSeverity};

/// Predicts the composition distribution for a site under the given weather.
///
/// Starts from the land use's base profile, applies the bounded weather
/// deltas (heavy rain washes organic material into the channel at plastic's
/// expense; high wind does the reverse), then renormalizes so the
/// percentages sum to exactly 100.0 at one-decimal precision. Deterministic:
/// identical inputs always produce the identical map.
pub fn predict_composition(
    profiles: &CompositionProfiles,
    adjustments: &CompositionAdjustments,
    land_use: LandUse,
    severity: WeatherSeverity,
) -> BTreeMap<DebrisCategory, f64> {
    let base = profiles.get(land_use);
    let mut pct: BTreeMap<DebrisCategory, f64> = DebrisCategory::ALL
        .iter()
        .map(|&category| (category, base.get(category)))
        .collect();

    if severity.rainfall_mm > adjustments.heavy_rain_mm {
        bump(&mut pct, DebrisCategory::Organic, adjustments.rain_organic_boost, adjustments.rain_organic_cap);
        cut(&mut pct, DebrisCategory::Plastic, adjustments.rain_plastic_cut, adjustments.rain_plastic_floor);
    }
    if severity.wind_kph > adjustments.high_wind_kph {
        bump(&mut pct, DebrisCategory::Plastic, adjustments.wind_plastic_boost, adjustments.wind_plastic_cap);
        cut(&mut pct, DebrisCategory::Organic, adjustments.wind_organic_cut, adjustments.wind_organic_floor);
    }

    renormalize(&mut pct);
    pct
}

fn bump(pct: &mut BTreeMap<DebrisCategory, f64>, category: DebrisCategory, delta: f64, cap: f64) {
    if let Some(entry) = pct.get_mut(&category) {
        // A base share already above the cap is left alone rather than cut.
        *entry = (*entry + delta).min(cap.max(*entry));
    }
}

fn cut(pct: &mut BTreeMap<DebrisCategory, f64>, category: DebrisCategory, delta: f64, floor: f64) {
    if let Some(entry) = pct.get_mut(&category) {
        *entry = (*entry - delta).max(floor.min(*entry));
    }
}

/// Rescales the distribution to sum to 100, rounds to one decimal place,
/// and folds any rounding residue into the plastic share (the dominant
/// category at nearly every site, so the residue disappears into it).
fn renormalize(pct: &mut BTreeMap<DebrisCategory, f64>) {
    let total: f64 = pct.values().sum();
    if total > 0.0 {
        let factor = 100.0 / total;
        for value in pct.values_mut() {
            *value = round1(*value * factor);
        }
    }
    let rounded_total: f64 = pct.values().sum();
    let residue = round1(100.0 - rounded_total);
    if residue != 0.0 {
        if let Some(plastic) = pct.get_mut(&DebrisCategory::Plastic) {
            *plastic = round1(*plastic + residue);
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn predict(land_use: LandUse, rainfall_mm: f64, wind_kph: f64) -> BTreeMap<DebrisCategory, f64> {
        let config = EngineConfig::builtin();
        predict_composition(
            &config.profiles,
            &config.adjustments,
            land_use,
            WeatherSeverity { rainfall_mm, wind_kph },
        )
    }

    fn total(pct: &BTreeMap<DebrisCategory, f64>) -> f64 {
        pct.values().sum()
    }

    #[test]
    fn test_calm_weather_returns_base_profile() {
        let pct = predict(LandUse::Urban, 0.0, 0.0);
        assert_eq!(pct[&DebrisCategory::Plastic], 55.0);
        assert_eq!(pct[&DebrisCategory::Organic], 20.0);
        assert_eq!(pct[&DebrisCategory::Household], 15.0);
        assert_eq!(pct[&DebrisCategory::Industrial], 5.0);
        assert_eq!(pct[&DebrisCategory::Others], 5.0);
    }

    #[test]
    fn test_heavy_rain_shifts_toward_organic() {
        let calm = predict(LandUse::Urban, 0.0, 0.0);
        let wet = predict(LandUse::Urban, 45.0, 0.0);
        assert!(
            wet[&DebrisCategory::Organic] > calm[&DebrisCategory::Organic],
            "rain should raise the organic share"
        );
        assert!(
            wet[&DebrisCategory::Plastic] < calm[&DebrisCategory::Plastic],
            "rain should lower the plastic share"
        );
    }

    #[test]
    fn test_high_wind_shifts_toward_plastic() {
        let calm = predict(LandUse::Rural, 0.0, 0.0);
        let windy = predict(LandUse::Rural, 0.0, 40.0);
        assert!(windy[&DebrisCategory::Plastic] > calm[&DebrisCategory::Plastic]);
        assert!(windy[&DebrisCategory::Organic] < calm[&DebrisCategory::Organic]);
    }

    #[test]
    fn test_rain_organic_share_is_capped() {
        // Rural organic is 45; boost of 10 hits the 60 cap only via repeated
        // application, so a single pass lands at 55 — below the cap.
        let wet = predict(LandUse::Rural, 100.0, 0.0);
        let cap = EngineConfig::builtin().adjustments.rain_organic_cap;
        assert!(
            wet[&DebrisCategory::Organic] <= cap + 0.1,
            "organic {} exceeds cap {}",
            wet[&DebrisCategory::Organic],
            cap
        );
    }

    #[test]
    fn test_every_combination_sums_to_100() {
        for land_use in LandUse::ALL {
            for &(rain, wind) in &[
                (0.0, 0.0),
                (45.0, 0.0),
                (0.0, 40.0),
                (45.0, 40.0),
                (500.0, 150.0),
            ] {
                let pct = predict(land_use, rain, wind);
                let sum = total(&pct);
                assert!(
                    (sum - 100.0).abs() <= 0.1,
                    "{} at rain={} wind={} sums to {}",
                    land_use,
                    rain,
                    wind,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_all_percentages_non_negative() {
        for land_use in LandUse::ALL {
            let pct = predict(land_use, 500.0, 150.0);
            for (category, value) in &pct {
                assert!(*value >= 0.0, "{} {} went negative: {}", land_use, category, value);
            }
        }
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let a = predict(LandUse::Coastal, 33.3, 27.1);
        let b = predict(LandUse::Coastal, 33.3, 27.1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Rain exactly at the trigger threshold does not shift the profile.
        let threshold = EngineConfig::builtin().adjustments.heavy_rain_mm;
        let at = predict(LandUse::Urban, threshold, 0.0);
        let calm = predict(LandUse::Urban, 0.0, 0.0);
        assert_eq!(at, calm);
    }

    #[test]
    fn test_all_five_categories_always_present() {
        let pct = predict(LandUse::Mixed, 45.0, 40.0);
        assert_eq!(pct.len(), 5);
        for category in DebrisCategory::ALL {
            assert!(pct.contains_key(&category), "missing {}", category);
        }
    }
}
