/// Risk classification: DRI score → discrete risk level.

use crate::config::RiskBand;
use crate::model::RiskLevel;

/// Returns the risk level whose band contains the score.
///
/// Bands are lower-inclusive, upper-exclusive; the final band is closed at
/// its upper end so 100 classifies as the top level. Scores outside [0,100]
/// are out of contract (the weighting engine already bounds its output) but
/// still classify deterministically: below-range scores take the first band,
/// above-range the last.
pub fn classify(bands: &[RiskBand], dri: f64) -> RiskLevel {
    for band in bands {
        if dri < band.upper {
            return band.level;
        }
    }
    bands
        .last()
        .map(|b| b.level)
        .unwrap_or(RiskLevel::VeryLow) // unreachable for a validated table
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
