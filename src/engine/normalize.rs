/// Raw-value normalization.
///
/// Maps a factor's raw physical measurement onto the common 0–100 scale by
/// linear interpolation across the factor's configured breakpoints. Raw
/// values outside the physical domain are expected (sensor noise, extreme
/// events) and saturate to the boundary — they never error.

use crate::config::{EngineConfig, FactorScale};
use crate::model::{NormalizedFactor, Reading};

/// Normalizes a raw value against one factor's scale.
///
/// The raw value is clamped to the span of the breakpoints before
/// interpolation, so the result is always within [0,100] and the function is
/// monotonic non-decreasing over all of f64. A NaN raw value is treated as
/// the domain minimum (the conservative end of every curve).
pub fn normalize(scale: &FactorScale, raw: f64) -> f64 {
    let raw = if raw.is_nan() { scale.domain_min() } else { raw };
    let clamped = raw.clamp(scale.domain_min(), scale.domain_max());

    for pair in scale.breakpoints.windows(2) {
        if clamped <= pair[1].raw {
            let span = pair[1].raw - pair[0].raw;
            let t = (clamped - pair[0].raw) / span;
            let score = pair[0].score + t * (pair[1].score - pair[0].score);
            return score.clamp(0.0, 100.0);
        }
    }
    // Unreachable for a validated scale (clamped <= last breakpoint), but the
    // boundary score is the right answer either way.
    scale
        .breakpoints
        .last()
        .map(|bp| bp.score)
        .unwrap_or(0.0)
}

/// Normalizes one reading into its weighted, scored form.
pub fn normalize_reading(config: &EngineConfig, reading: &Reading) -> NormalizedFactor {
    let scale = config.scales.get(reading.factor);
    NormalizedFactor {
        factor: reading.factor,
        value: reading.value,
        weight: config.weights.get(reading.factor),
        normalized: normalize(scale, reading.value),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
