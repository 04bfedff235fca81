/// Engine configuration: every constant table the DRI computation reads.
///
/// The original deployment kept these as scattered module-level constants.
/// Here they are one immutable, validated structure installed once at process
/// start and read-only for the lifetime of the process. All engine functions
/// take `&EngineConfig` explicitly, so tests can run against modified tables
/// without touching global state.
///
/// Defaults are compiled in (`EngineConfig::builtin`); deployments can
/// override individual sections from a TOML file the same way station
/// configuration files are loaded elsewhere in the service.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::model::{DebrisCategory, DriError, Factor, LandUse, RiskLevel};

/// Tolerance for the weight-sum check. Weights are configuration, not
/// measurements, so anything beyond float noise is a config bug.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Tolerance for composition profile sums (percentages, hand-maintained).
pub const PROFILE_TOLERANCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Normalization scales
// ---------------------------------------------------------------------------

/// One vertex of a piecewise-linear normalization curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Breakpoint {
    /// Raw value in the factor's physical unit.
    pub raw: f64,
    /// Normalized score at that raw value, in [0,100].
    pub score: f64,
}

/// Piecewise-linear mapping from a factor's raw value to a 0–100 score.
///
/// The factor's physical domain is the span of the breakpoints: raw values
/// below the first or above the last breakpoint clamp to the boundary score.
/// Breakpoints must be strictly increasing in `raw` and non-decreasing in
/// `score`, which makes the whole curve monotonic by construction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactorScale {
    pub breakpoints: Vec<Breakpoint>,
}

impl FactorScale {
    pub fn domain_min(&self) -> f64 {
        self.breakpoints.first().map(|b| b.raw).unwrap_or(0.0)
    }

    pub fn domain_max(&self) -> f64 {
        self.breakpoints.last().map(|b| b.raw).unwrap_or(0.0)
    }

    fn validate(&self, factor: Factor) -> Result<(), DriError> {
        if self.breakpoints.len() < 2 {
            return Err(DriError::Configuration(format!(
                "scale for {} needs at least 2 breakpoints, got {}",
                factor,
                self.breakpoints.len()
            )));
        }
        for pair in self.breakpoints.windows(2) {
            if pair[1].raw <= pair[0].raw {
                return Err(DriError::Configuration(format!(
                    "scale for {} has non-increasing raw values ({} then {})",
                    factor, pair[0].raw, pair[1].raw
                )));
            }
            if pair[1].score < pair[0].score {
                return Err(DriError::Configuration(format!(
                    "scale for {} has a decreasing score ({} then {}) — \
                     normalization must be monotonic",
                    factor, pair[0].score, pair[1].score
                )));
            }
        }
        for bp in &self.breakpoints {
            if !(0.0..=100.0).contains(&bp.score) {
                return Err(DriError::Configuration(format!(
                    "scale for {} has score {} outside [0,100]",
                    factor, bp.score
                )));
            }
        }
        Ok(())
    }
}

/// Normalization scales for all four factors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScaleTable {
    pub rainfall: FactorScale,
    pub wind_speed: FactorScale,
    pub tide_level: FactorScale,
    pub water_flow: FactorScale,
}

impl ScaleTable {
    pub fn get(&self, factor: Factor) -> &FactorScale {
        match factor {
            Factor::Rainfall => &self.rainfall,
            Factor::WindSpeed => &self.wind_speed,
            Factor::TideLevel => &self.tide_level,
            Factor::WaterFlow => &self.water_flow,
        }
    }
}

// ---------------------------------------------------------------------------
// Factor weights
// ---------------------------------------------------------------------------

/// Fixed weights for combining normalized factor scores into the DRI.
///
/// Must sum to 1.0 within `WEIGHT_TOLERANCE` — this is what keeps the
/// composite score inside [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FactorWeights {
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
    pub water_flow: f64,
}

impl FactorWeights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Rainfall => self.rainfall,
            Factor::WindSpeed => self.wind_speed,
            Factor::TideLevel => self.tide_level,
            Factor::WaterFlow => self.water_flow,
        }
    }

    pub fn sum(&self) -> f64 {
        self.rainfall + self.wind_speed + self.tide_level + self.water_flow
    }

    fn validate(&self) -> Result<(), DriError> {
        for factor in Factor::ALL {
            let w = self.get(factor);
            if !(0.0..=1.0).contains(&w) {
                return Err(DriError::Configuration(format!(
                    "weight for {} is {} — must be in [0,1]",
                    factor, w
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DriError::Configuration(format!(
                "factor weights sum to {} — must sum to 1.0",
                sum
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Risk bands
// ---------------------------------------------------------------------------

/// One band of the risk-level partition of [0,100].
///
/// Bands are lower-inclusive, upper-exclusive; the classifier treats the
/// final band as closed at 100 so the partition is total. Chosen convention
/// (the original UI text disagreed with itself): five bands,
/// [0,30) Very Low, [30,50) Low, [50,70) Medium, [70,85) High,
/// [85,100] Critical.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RiskBand {
    pub level: RiskLevel,
    pub lower: f64,
    pub upper: f64,
}

fn validate_bands(bands: &[RiskBand]) -> Result<(), DriError> {
    let Some(first) = bands.first() else {
        return Err(DriError::Configuration("risk band table is empty".to_string()));
    };
    let last = bands.last().unwrap();
    if first.lower != 0.0 {
        return Err(DriError::Configuration(format!(
            "first risk band starts at {} — must start at 0",
            first.lower
        )));
    }
    if last.upper != 100.0 {
        return Err(DriError::Configuration(format!(
            "last risk band ends at {} — must end at 100",
            last.upper
        )));
    }
    for band in bands {
        if band.lower >= band.upper {
            return Err(DriError::Configuration(format!(
                "risk band {} has empty range [{}, {})",
                band.level, band.lower, band.upper
            )));
        }
    }
    for pair in bands.windows(2) {
        if pair[0].upper != pair[1].lower {
            return Err(DriError::Configuration(format!(
                "risk bands {} and {} leave a gap or overlap between {} and {}",
                pair[0].level, pair[1].level, pair[0].upper, pair[1].lower
            )));
        }
    }
    let mut seen = std::collections::HashSet::new();
    for band in bands {
        if !seen.insert(band.level) {
            return Err(DriError::Configuration(format!(
                "risk level {} appears in more than one band",
                band.level
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Debris baselines
// ---------------------------------------------------------------------------

/// Baseline daily debris mass (kg/day) per land-use category, calibrated
/// against the Sungai Klang reference monitoring site, plus the DRI value at
/// which the reference site produced exactly its baseline mass.
///
/// The estimator scales the baseline by `dri / reference_dri`, so a site at
/// the reference risk level sheds its baseline mass and risk above it scales
/// the mass proportionally.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DebrisBaselines {
    pub urban: f64,
    pub industrial: f64,
    pub rural: f64,
    pub coastal: f64,
    pub mixed: f64,
    pub reference_dri: f64,
}

impl DebrisBaselines {
    pub fn get(&self, land_use: LandUse) -> f64 {
        match land_use {
            LandUse::Urban => self.urban,
            LandUse::Industrial => self.industrial,
            LandUse::Rural => self.rural,
            LandUse::Coastal => self.coastal,
            LandUse::Mixed => self.mixed,
        }
    }

    fn validate(&self) -> Result<(), DriError> {
        for land_use in LandUse::ALL {
            let baseline = self.get(land_use);
            if baseline <= 0.0 || !baseline.is_finite() {
                return Err(DriError::Configuration(format!(
                    "debris baseline for {} is {} — must be a positive mass",
                    land_use, baseline
                )));
            }
        }
        if self.reference_dri <= 0.0 || self.reference_dri > 100.0 {
            return Err(DriError::Configuration(format!(
                "reference DRI is {} — must be in (0,100]",
                self.reference_dri
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Composition profiles
// ---------------------------------------------------------------------------

/// Percentage distribution of debris mass across material categories.
/// Must sum to 100 within `PROFILE_TOLERANCE`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CompositionProfile {
    pub plastic: f64,
    pub organic: f64,
    pub household: f64,
    pub industrial: f64,
    pub others: f64,
}

impl CompositionProfile {
    pub fn get(&self, category: DebrisCategory) -> f64 {
        match category {
            DebrisCategory::Plastic => self.plastic,
            DebrisCategory::Organic => self.organic,
            DebrisCategory::Household => self.household,
            DebrisCategory::Industrial => self.industrial,
            DebrisCategory::Others => self.others,
        }
    }

    pub fn sum(&self) -> f64 {
        self.plastic + self.organic + self.household + self.industrial + self.others
    }

    fn validate(&self, land_use: LandUse) -> Result<(), DriError> {
        for category in DebrisCategory::ALL {
            let pct = self.get(category);
            if pct < 0.0 || !pct.is_finite() {
                return Err(DriError::Configuration(format!(
                    "{} profile has {} at {} — percentages must be non-negative",
                    land_use, category, pct
                )));
            }
        }
        let sum = self.sum();
        if (sum - 100.0).abs() > PROFILE_TOLERANCE {
            return Err(DriError::Configuration(format!(
                "{} profile sums to {} — must sum to 100",
                land_use, sum
            )));
        }
        Ok(())
    }
}

/// Base composition profiles for every land-use category.
///
/// Sources: field survey composition studies of Malaysian river debris,
/// carried over from the original site records.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CompositionProfiles {
    pub urban: CompositionProfile,
    pub industrial: CompositionProfile,
    pub rural: CompositionProfile,
    pub coastal: CompositionProfile,
    pub mixed: CompositionProfile,
}

impl CompositionProfiles {
    pub fn get(&self, land_use: LandUse) -> &CompositionProfile {
        match land_use {
            LandUse::Urban => &self.urban,
            LandUse::Industrial => &self.industrial,
            LandUse::Rural => &self.rural,
            LandUse::Coastal => &self.coastal,
            LandUse::Mixed => &self.mixed,
        }
    }

    fn validate(&self) -> Result<(), DriError> {
        for land_use in LandUse::ALL {
            self.get(land_use).validate(land_use)?;
        }
        Ok(())
    }
}

/// Weather-driven deltas applied on top of the base composition profile.
///
/// Heavy rain washes organic and household material off the land; high wind
/// carries lightweight plastic into the channel. All deltas are additive and
/// bounded by caps/floors, then the distribution is renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CompositionAdjustments {
    /// Rainfall above this (mm) triggers the rain shift.
    pub heavy_rain_mm: f64,
    pub rain_organic_boost: f64,
    pub rain_organic_cap: f64,
    pub rain_plastic_cut: f64,
    pub rain_plastic_floor: f64,
    /// Wind above this (kph) triggers the wind shift.
    pub high_wind_kph: f64,
    pub wind_plastic_boost: f64,
    pub wind_plastic_cap: f64,
    pub wind_organic_cut: f64,
    pub wind_organic_floor: f64,
}

impl CompositionAdjustments {
    fn validate(&self) -> Result<(), DriError> {
        let non_negative = [
            ("heavy_rain_mm", self.heavy_rain_mm),
            ("rain_organic_boost", self.rain_organic_boost),
            ("rain_plastic_cut", self.rain_plastic_cut),
            ("high_wind_kph", self.high_wind_kph),
            ("wind_plastic_boost", self.wind_plastic_boost),
            ("wind_organic_cut", self.wind_organic_cut),
        ];
        for (name, v) in non_negative {
            if v < 0.0 || !v.is_finite() {
                return Err(DriError::Configuration(format!(
                    "composition adjustment {} is {} — must be non-negative",
                    name, v
                )));
            }
        }
        let bounded = [
            ("rain_organic_cap", self.rain_organic_cap),
            ("rain_plastic_floor", self.rain_plastic_floor),
            ("wind_plastic_cap", self.wind_plastic_cap),
            ("wind_organic_floor", self.wind_organic_floor),
        ];
        for (name, v) in bounded {
            if !(0.0..=100.0).contains(&v) {
                return Err(DriError::Configuration(format!(
                    "composition adjustment {} is {} — must be in [0,100]",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// The complete, validated configuration for the DRI engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: FactorWeights,
    pub scales: ScaleTable,
    pub bands: Vec<RiskBand>,
    pub baselines: DebrisBaselines,
    pub profiles: CompositionProfiles,
    pub adjustments: CompositionAdjustments,
}

impl EngineConfig {
    /// The compiled-in default tables.
    ///
    /// Normalization breakpoints mirror the documented risk escalation curve
    /// per factor: monsoon-scale rainfall dominates above 200 mm, storm-force
    /// wind above 120 kph, spring tide above 3 m, flood-stage flow above
    /// 300 m³/s.
    pub fn builtin() -> EngineConfig {
        EngineConfig {
            weights: FactorWeights {
                rainfall: 0.40,
                wind_speed: 0.25,
                tide_level: 0.20,
                water_flow: 0.15,
            },
            scales: ScaleTable {
                rainfall: FactorScale {
                    breakpoints: vec![
                        Breakpoint { raw: 0.0, score: 0.0 },
                        Breakpoint { raw: 50.0, score: 50.0 },
                        Breakpoint { raw: 200.0, score: 100.0 },
                        Breakpoint { raw: 500.0, score: 100.0 },
                    ],
                },
                wind_speed: FactorScale {
                    breakpoints: vec![
                        Breakpoint { raw: 0.0, score: 0.0 },
                        Breakpoint { raw: 25.0, score: 40.0 },
                        Breakpoint { raw: 60.0, score: 75.0 },
                        Breakpoint { raw: 120.0, score: 100.0 },
                        Breakpoint { raw: 150.0, score: 100.0 },
                    ],
                },
                tide_level: FactorScale {
                    breakpoints: vec![
                        Breakpoint { raw: 0.0, score: 0.0 },
                        Breakpoint { raw: 1.5, score: 40.0 },
                        Breakpoint { raw: 3.0, score: 80.0 },
                        Breakpoint { raw: 5.0, score: 100.0 },
                    ],
                },
                water_flow: FactorScale {
                    breakpoints: vec![
                        Breakpoint { raw: 0.0, score: 0.0 },
                        Breakpoint { raw: 100.0, score: 50.0 },
                        Breakpoint { raw: 300.0, score: 90.0 },
                        Breakpoint { raw: 500.0, score: 100.0 },
                    ],
                },
            },
            bands: vec![
                RiskBand { level: RiskLevel::VeryLow, lower: 0.0, upper: 30.0 },
                RiskBand { level: RiskLevel::Low, lower: 30.0, upper: 50.0 },
                RiskBand { level: RiskLevel::Medium, lower: 50.0, upper: 70.0 },
                RiskBand { level: RiskLevel::High, lower: 70.0, upper: 85.0 },
                RiskBand { level: RiskLevel::Critical, lower: 85.0, upper: 100.0 },
            ],
            baselines: DebrisBaselines {
                urban: 11_600.0,
                industrial: 14_500.0,
                rural: 6_800.0,
                coastal: 9_200.0,
                mixed: 10_400.0,
                reference_dri: 70.0,
            },
            profiles: CompositionProfiles {
                urban: CompositionProfile {
                    plastic: 55.0, organic: 20.0, household: 15.0, industrial: 5.0, others: 5.0,
                },
                industrial: CompositionProfile {
                    plastic: 35.0, organic: 10.0, household: 10.0, industrial: 35.0, others: 10.0,
                },
                rural: CompositionProfile {
                    plastic: 25.0, organic: 45.0, household: 15.0, industrial: 5.0, others: 10.0,
                },
                coastal: CompositionProfile {
                    // "others" is high here: fishing gear and marine debris.
                    plastic: 40.0, organic: 20.0, household: 10.0, industrial: 10.0, others: 20.0,
                },
                mixed: CompositionProfile {
                    plastic: 45.0, organic: 25.0, household: 15.0, industrial: 10.0, others: 5.0,
                },
            },
            adjustments: CompositionAdjustments {
                heavy_rain_mm: 30.0,
                rain_organic_boost: 10.0,
                rain_organic_cap: 60.0,
                rain_plastic_cut: 5.0,
                rain_plastic_floor: 10.0,
                high_wind_kph: 25.0,
                wind_plastic_boost: 8.0,
                wind_plastic_cap: 70.0,
                wind_organic_cut: 5.0,
                wind_organic_floor: 5.0,
            },
        }
    }

    /// Checks every table for internal consistency.
    ///
    /// This runs once when a config is installed — call-time engine code
    /// never re-checks these invariants.
    pub fn validate(&self) -> Result<(), DriError> {
        self.weights.validate()?;
        for factor in Factor::ALL {
            self.scales.get(factor).validate(factor)?;
        }
        validate_bands(&self.bands)?;
        self.baselines.validate()?;
        self.profiles.validate()?;
        self.adjustments.validate()?;
        Ok(())
    }

    /// Builds a config from a TOML document, starting from the builtin
    /// defaults and replacing any section the document provides. The result
    /// is validated before it is returned.
    pub fn from_toml_str(doc: &str) -> Result<EngineConfig, DriError> {
        let overrides: ConfigOverrides = toml::from_str(doc)
            .map_err(|e| DriError::Configuration(format!("TOML parse error: {}", e)))?;
        let mut config = EngineConfig::builtin();
        overrides.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Loads overrides from a TOML file on disk. See `from_toml_str`.
    pub fn from_toml_file(path: &str) -> Result<EngineConfig, DriError> {
        let doc = std::fs::read_to_string(path)
            .map_err(|e| DriError::Configuration(format!("cannot read {}: {}", path, e)))?;
        Self::from_toml_str(&doc)
    }
}

/// Optional override sections, mirroring `EngineConfig` one-to-one.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    weights: Option<FactorWeights>,
    scales: Option<ScaleOverrides>,
    bands: Option<Vec<RiskBand>>,
    baselines: Option<DebrisBaselines>,
    profiles: Option<CompositionProfiles>,
    adjustments: Option<CompositionAdjustments>,
}

#[derive(Debug, Default, Deserialize)]
struct ScaleOverrides {
    rainfall: Option<FactorScale>,
    wind_speed: Option<FactorScale>,
    tide_level: Option<FactorScale>,
    water_flow: Option<FactorScale>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut EngineConfig) {
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(scales) = self.scales {
            if let Some(s) = scales.rainfall {
                config.scales.rainfall = s;
            }
            if let Some(s) = scales.wind_speed {
                config.scales.wind_speed = s;
            }
            if let Some(s) = scales.tide_level {
                config.scales.tide_level = s;
            }
            if let Some(s) = scales.water_flow {
                config.scales.water_flow = s;
            }
        }
        if let Some(bands) = self.bands {
            config.bands = bands;
        }
        if let Some(baselines) = self.baselines {
            config.baselines = baselines;
        }
        if let Some(profiles) = self.profiles {
            config.profiles = profiles;
        }
        if let Some(adjustments) = self.adjustments {
            config.adjustments = adjustments;
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide instance
// ---------------------------------------------------------------------------

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Installs the process-wide configuration. Call once at startup, before any
/// scoring request is served. Fails if the config is invalid or if a config
/// has already been installed (including implicitly via `get`).
pub fn install(config: EngineConfig) -> Result<(), DriError> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| DriError::Configuration("engine config already installed".to_string()))
}

/// Returns the process-wide configuration, falling back to the builtin
/// tables if `install` was never called.
pub fn get() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::builtin)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
