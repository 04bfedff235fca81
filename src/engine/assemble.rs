/// The report assembler: one immutable `DriResult` per (site, instant) query.
///
/// # Clock injection
/// `assemble_at` takes `now: DateTime<Utc>` rather than reading the clock
/// internally, which keeps assembly a pure function and makes idempotence
/// testable without time manipulation. `assemble` is the convenience wrapper
/// for callers on the live path.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::{self, EngineConfig};
use crate::engine::{classify, compute_dri, estimate_debris, normalize_reading, predict_composition};
use crate::model::{
    DriError, DriResult, Factor, LandUse, NormalizedFactor, Reading, WeatherSeverity,
};
use crate::sites::RiverSite;

/// Assembles a DRI report from one reading per required factor.
///
/// Fails with `MissingReading` if any required factor is absent — a missing
/// sensor must surface as "data unavailable", never as a silently defaulted
/// score, so no partial result is ever returned. If a factor appears more
/// than once in the input, the first reading wins.
///
/// The reported score, estimate, and raw values are rounded to two decimals
/// for the wire record; classification and estimation run on the rounded
/// score so the persisted level always agrees with the persisted score.
pub fn assemble_at(
    config: &EngineConfig,
    land_use: LandUse,
    readings: &[Reading],
    now: DateTime<Utc>,
) -> Result<DriResult, DriError> {
    let mut factors: BTreeMap<Factor, NormalizedFactor> = BTreeMap::new();
    for required in Factor::ALL {
        let reading = readings
            .iter()
            .find(|r| r.factor == required)
            .ok_or(DriError::MissingReading(required))?;
        let mut normalized = normalize_reading(config, reading);
        normalized.value = round2(normalized.value);
        normalized.normalized = round2(normalized.normalized);
        factors.insert(required, normalized);
    }

    let ordered: Vec<NormalizedFactor> = factors.values().copied().collect();
    let dri_score = round2(compute_dri(&config.weights, &ordered)?);
    let risk_level = classify(&config.bands, dri_score);

    // Severity reflects what the sensors reported, not the clamped values:
    // a 45 mm reading and a 450 mm reading both trigger the rain shift.
    let severity = WeatherSeverity {
        rainfall_mm: factors[&Factor::Rainfall].value,
        wind_kph: factors[&Factor::WindSpeed].value,
    };

    Ok(DriResult {
        dri_score,
        risk_level,
        risk_color: risk_level.color().to_string(),
        debris_estimate_kg: round2(estimate_debris(&config.baselines, dri_score, land_use)),
        debris_types: predict_composition(
            &config.profiles,
            &config.adjustments,
            land_use,
            severity,
        ),
        land_use,
        factors,
        timestamp: now,
    })
}

/// Assembles a report for a registered site against the process-wide
/// configuration, stamped with the current time.
pub fn assemble(site: &RiverSite, readings: &[Reading]) -> Result<DriResult, DriError> {
    assemble_at(config::get(), site.land_use, readings, Utc::now())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DebrisCategory, RiskLevel};
    use chrono::TimeZone;

    fn full_readings(rain: f64, wind: f64, tide: f64, flow: f64) -> Vec<Reading> {
        vec![
            Reading::new(Factor::Rainfall, rain),
            Reading::new(Factor::WindSpeed, wind),
            Reading::new(Factor::TideLevel, tide),
            Reading::new(Factor::WaterFlow, flow),
        ]
    }

    /// A fixed assembly instant used across tests: 2025-11-03 08:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_calm_conditions_land_in_the_lowest_band() {
        let config = EngineConfig::builtin();
        let result = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(0.0, 0.0, 0.0, 0.0),
            fixed_now(),
        )
        .expect("complete reading set should assemble");

        assert_eq!(result.dri_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::VeryLow);
        assert_eq!(result.risk_color, "#28a745");
        assert_eq!(result.debris_estimate_kg, 0.0);
    }

    #[test]
    fn test_domain_max_conditions_are_critical() {
        let config = EngineConfig::builtin();
        let result = assemble_at(
            &config,
            LandUse::Industrial,
            &full_readings(500.0, 150.0, 5.0, 500.0),
            fixed_now(),
        )
        .expect("complete reading set should assemble");

        assert_eq!(result.dri_score, 100.0);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.risk_color, "#dc3545");
        assert!(
            result.debris_estimate_kg > config.baselines.industrial,
            "critical-risk estimate {} should exceed the industrial baseline {}",
            result.debris_estimate_kg,
            config.baselines.industrial
        );
    }

    #[test]
    fn test_missing_wind_reading_fails_with_no_partial_result() {
        let config = EngineConfig::builtin();
        let readings = vec![
            Reading::new(Factor::Rainfall, 12.0),
            Reading::new(Factor::TideLevel, 1.0),
            Reading::new(Factor::WaterFlow, 40.0),
        ];
        let err = assemble_at(&config, LandUse::Urban, &readings, fixed_now())
            .expect_err("missing wind_speed must fail assembly");
        assert_eq!(err, DriError::MissingReading(Factor::WindSpeed));
    }

    #[test]
    fn test_far_out_of_domain_rainfall_clamps_without_error() {
        let config = EngineConfig::builtin();
        let extreme = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(10_000.0, 10.0, 1.0, 50.0),
            fixed_now(),
        )
        .expect("out-of-domain raw values clamp, they do not error");
        let at_max = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(500.0, 10.0, 1.0, 50.0),
            fixed_now(),
        )
        .unwrap();

        let extreme_rain = extreme.factors[&Factor::Rainfall];
        let max_rain = at_max.factors[&Factor::Rainfall];
        assert_eq!(extreme_rain.normalized, max_rain.normalized);
        assert_eq!(extreme_rain.normalized, 100.0);
        // The raw value is reported as the sensor sent it.
        assert_eq!(extreme_rain.value, 10_000.0);
        assert_eq!(extreme.dri_score, at_max.dri_score);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let config = EngineConfig::builtin();
        let readings = full_readings(35.0, 28.0, 1.8, 120.0);
        let a = assemble_at(&config, LandUse::Coastal, &readings, fixed_now()).unwrap();
        let b = assemble_at(&config, LandUse::Coastal, &readings, fixed_now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_factor_first_reading_wins() {
        let config = EngineConfig::builtin();
        let mut readings = full_readings(10.0, 5.0, 0.5, 20.0);
        readings.push(Reading::new(Factor::Rainfall, 400.0));
        let result = assemble_at(&config, LandUse::Urban, &readings, fixed_now()).unwrap();
        assert_eq!(result.factors[&Factor::Rainfall].value, 10.0);
    }

    #[test]
    fn test_result_contains_one_factor_per_required_factor() {
        let config = EngineConfig::builtin();
        let result = assemble_at(
            &config,
            LandUse::Mixed,
            &full_readings(20.0, 15.0, 1.0, 80.0),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(result.factors.len(), 4);
        for factor in Factor::ALL {
            let nf = &result.factors[&factor];
            assert_eq!(nf.weight, config.weights.get(factor));
            assert!((0.0..=100.0).contains(&nf.normalized));
        }
    }

    #[test]
    fn test_score_and_level_agree_in_the_output_record() {
        // The persisted level must be the classification of the persisted
        // (rounded) score, never of an unrounded intermediate.
        let config = EngineConfig::builtin();
        for rain in [0.0, 29.0, 74.9, 75.0, 120.0, 333.3] {
            let result = assemble_at(
                &config,
                LandUse::Urban,
                &full_readings(rain, 30.0, 2.0, 150.0),
                fixed_now(),
            )
            .unwrap();
            assert_eq!(
                result.risk_level,
                classify(&config.bands, result.dri_score),
                "score {} recorded with mismatched level",
                result.dri_score
            );
        }
    }

    #[test]
    fn test_timestamp_is_the_supplied_instant() {
        let config = EngineConfig::builtin();
        let result = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(1.0, 1.0, 1.0, 1.0),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(result.timestamp, fixed_now());
    }

    #[test]
    fn test_wire_shape_of_serialized_result() {
        let config = EngineConfig::builtin();
        let result = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(45.0, 30.0, 1.5, 100.0),
            fixed_now(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["dri_score"].is_number());
        assert!(json["risk_level"].is_string());
        assert!(json["risk_color"].as_str().unwrap().starts_with('#'));
        assert_eq!(json["land_use"], "urban");
        let rainfall = &json["factors"]["rainfall"];
        assert_eq!(rainfall["value"], 45.0);
        assert_eq!(rainfall["weight"], 0.40);
        assert!(rainfall["normalized"].is_number());
        assert!(json["debris_types"]["plastic"].is_number());
        assert!(json["debris_types"]["others"].is_number());
        // chrono serializes DateTime<Utc> as RFC 3339.
        assert!(json["timestamp"].as_str().unwrap().starts_with("2025-11-03T08:00:00"));
    }

    #[test]
    fn test_heavy_rain_report_shifts_composition() {
        let config = EngineConfig::builtin();
        let calm = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(0.0, 0.0, 1.0, 50.0),
            fixed_now(),
        )
        .unwrap();
        let storm = assemble_at(
            &config,
            LandUse::Urban,
            &full_readings(80.0, 0.0, 1.0, 50.0),
            fixed_now(),
        )
        .unwrap();
        assert!(
            storm.debris_types[&DebrisCategory::Organic]
                > calm.debris_types[&DebrisCategory::Organic]
        );
    }
}
