/// Core data types for the DebriSense risk engine.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no scoring logic and no I/O — only types, their serde shapes,
/// and the engine's error enum.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Environmental factors
// ---------------------------------------------------------------------------

/// The four environmental factors the DRI is computed from.
///
/// Ordering matters: iteration and serialization always present factors in
/// this declaration order (rainfall first, matching its dominant weight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Rainfall,
    WindSpeed,
    TideLevel,
    WaterFlow,
}

impl Factor {
    /// All factors required for a DRI computation, in canonical order.
    pub const ALL: [Factor; 4] = [
        Factor::Rainfall,
        Factor::WindSpeed,
        Factor::TideLevel,
        Factor::WaterFlow,
    ];

    /// Snake_case name used in JSON output and TOML configuration keys.
    pub fn name(&self) -> &'static str {
        match self {
            Factor::Rainfall => "rainfall",
            Factor::WindSpeed => "wind_speed",
            Factor::TideLevel => "tide_level",
            Factor::WaterFlow => "water_flow",
        }
    }

    /// Physical unit of the raw value for display and CSV headers.
    pub fn unit(&self) -> &'static str {
        match self {
            Factor::Rainfall => "mm",
            Factor::WindSpeed => "kph",
            Factor::TideLevel => "m",
            Factor::WaterFlow => "m3/s",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single raw measurement for one factor, as supplied by the weather or
/// gauge collaborator at query time. Immutable once captured.
///
/// Raw values are unit-specific (`Factor::unit`). Values outside the factor's
/// physical domain are legal here — the normalizer clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub factor: Factor,
    pub value: f64,
}

impl Reading {
    pub fn new(factor: Factor, value: f64) -> Self {
        Reading { factor, value }
    }
}

/// A factor after normalization: the raw value, the weight it carries in the
/// composite score, and its 0–100 normalized score.
///
/// Invariant: `normalized` is always in [0,100] — the normalizer clamps raw
/// values to the factor domain before interpolating, so no input can escape
/// that range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedFactor {
    #[serde(skip)]
    pub factor: Factor,
    pub value: f64,
    pub weight: f64,
    pub normalized: f64,
}

// ---------------------------------------------------------------------------
// Risk levels
// ---------------------------------------------------------------------------

/// Discrete risk levels, in ascending order of severity.
///
/// Band boundaries live in `config::RiskBand`; this enum only carries the
/// label and its fixed display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Hex display color, one-to-one with the level. Used by the map UI.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "#28a745",
            RiskLevel::Low => "#90EE90",
            RiskLevel::Medium => "#ffc107",
            RiskLevel::High => "#fd7e14",
            RiskLevel::Critical => "#dc3545",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Land use
// ---------------------------------------------------------------------------

/// Land-use category of the terrain surrounding a monitoring site. Selects
/// the debris baseline mass and the base composition profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    Urban,
    Industrial,
    Rural,
    Coastal,
    Mixed,
}

impl LandUse {
    pub const ALL: [LandUse; 5] = [
        LandUse::Urban,
        LandUse::Industrial,
        LandUse::Rural,
        LandUse::Coastal,
        LandUse::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandUse::Urban => "urban",
            LandUse::Industrial => "industrial",
            LandUse::Rural => "rural",
            LandUse::Coastal => "coastal",
            LandUse::Mixed => "mixed",
        }
    }

    /// Parses a land-use tag from site metadata.
    ///
    /// Unknown or empty tags fall back to `Urban`. This is the documented
    /// default for unclassified sites, not an error: site records predating
    /// the land-use field carry no tag at all.
    pub fn parse_or_urban(tag: &str) -> LandUse {
        match tag.trim().to_ascii_lowercase().as_str() {
            "urban" => LandUse::Urban,
            "industrial" => LandUse::Industrial,
            "rural" => LandUse::Rural,
            "coastal" => LandUse::Coastal,
            "mixed" => LandUse::Mixed,
            _ => LandUse::Urban,
        }
    }
}

impl fmt::Display for LandUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Debris composition
// ---------------------------------------------------------------------------

/// Material categories for the debris composition breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebrisCategory {
    Plastic,
    Organic,
    Household,
    Industrial,
    Others,
}

impl DebrisCategory {
    pub const ALL: [DebrisCategory; 5] = [
        DebrisCategory::Plastic,
        DebrisCategory::Organic,
        DebrisCategory::Household,
        DebrisCategory::Industrial,
        DebrisCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebrisCategory::Plastic => "plastic",
            DebrisCategory::Organic => "organic",
            DebrisCategory::Household => "household",
            DebrisCategory::Industrial => "industrial",
            DebrisCategory::Others => "others",
        }
    }
}

impl fmt::Display for DebrisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate weather conditions used to shift the composition profile.
/// Derived from the rainfall and wind readings at assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherSeverity {
    pub rainfall_mm: f64,
    pub wind_kph: f64,
}

// ---------------------------------------------------------------------------
// Assembled result
// ---------------------------------------------------------------------------

/// The assembled DRI report for one site at one point in time.
///
/// Created fresh on every query and never mutated afterwards. Persisting it
/// is the storage collaborator's job (`history::SnapshotStore`); this crate
/// only produces the record. Serializes to the wire shape the map UI
/// consumes: factors keyed by name, composition keyed by category, timestamp
/// in RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriResult {
    pub dri_score: f64,
    pub risk_level: RiskLevel,
    pub risk_color: String,
    pub factors: BTreeMap<Factor, NormalizedFactor>,
    pub debris_estimate_kg: f64,
    pub land_use: LandUse,
    pub debris_types: BTreeMap<DebrisCategory, f64>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when validating configuration or assembling a
/// DRI report.
///
/// Out-of-domain raw values are deliberately NOT an error: sensor extremes
/// and noise are expected, and the normalizer clamps them to the factor
/// domain instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DriError {
    /// The weight set, scale table, risk bands, or composition profiles are
    /// malformed. Fatal at startup; never raised per call once the config
    /// has passed `EngineConfig::validate`.
    Configuration(String),
    /// A required factor's reading is absent from the input set. A missing
    /// sensor is a distinct failure mode from an out-of-range one — no
    /// default is substituted and no partial result is returned.
    MissingReading(Factor),
}

impl fmt::Display for DriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            DriError::MissingReading(factor) => {
                write!(f, "missing reading for required factor: {}", factor)
            }
        }
    }
}

impl std::error::Error for DriError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
