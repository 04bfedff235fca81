/// Debris mass estimation: DRI + land use → predicted daily debris mass.

use crate::config::DebrisBaselines;
use crate::model::LandUse;

/// Estimates the daily debris load in absolute kilograms.
///
/// The land-use baseline is scaled by the risk multiplier
/// `dri / reference_dri`: at the calibration DRI the site sheds exactly its
/// baseline mass, a zero-risk site sheds nothing, and a maxed-out DRI pushes
/// the estimate well past the baseline. The multiplier is linear in the
/// (clamped) score, so the estimate is monotonic in risk and never negative.
///
/// Callers with an unclassified site resolve the land use first via
/// `LandUse::parse_or_urban` — the urban fallback lives there, in one place.
pub fn estimate_debris(baselines: &DebrisBaselines, dri: f64, land_use: LandUse) -> f64 {
    let multiplier = dri.clamp(0.0, 100.0) / baselines.reference_dri;
    baselines.get(land_use) * multiplier
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
