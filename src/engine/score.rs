/// The weighting engine: combines normalized factor scores into one DRI.

use crate::config::FactorWeights;
use crate::model::{DriError, Factor, NormalizedFactor};

/// Computes the composite DRI as the weighted sum of all required factors.
///
/// Errors with `MissingReading` if any of the four required factors is absent
/// from the input — callers that assembled the slice via the report assembler
/// never see this, since the assembler checks completeness first. When a
/// factor appears more than once, the first occurrence wins.
///
/// Given weights that passed validation (sum 1.0, each in [0,1]) and
/// normalized scores in [0,100], the result is mathematically confined to
/// [0,100]; the final clamp makes that a hard guarantee against float
/// accumulation error rather than a typical outcome.
pub fn compute_dri(
    weights: &FactorWeights,
    factors: &[NormalizedFactor],
) -> Result<f64, DriError> {
    let mut dri = 0.0;
    for required in Factor::ALL {
        let factor = factors
            .iter()
            .find(|nf| nf.factor == required)
            .ok_or(DriError::MissingReading(required))?;
        dri += factor.normalized.clamp(0.0, 100.0) * weights.get(required);
    }
    Ok(dri.clamp(0.0, 100.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
