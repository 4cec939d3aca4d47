use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Holds every constant the scoring model uses: the composite weights, the
/// bounds of each normalization scale and the override policy. `Default`
/// reproduces the stock model, so an empty config scores exactly like no
/// config at all.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   override_policy: presence
///   weights: { commute: 0.25, flood: 0.25, pollution: 0.20, density: 0.15, green: 0.15 }
///   pollution: { aod_min: 0.02, aod_max: 0.6 }
///   density: { max_density: 40000 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// How pre-computed sub-scores in the input are recognized
    pub override_policy: OverridePolicy,

    /// Composite weights, must sum to 1.0
    pub weights: Weights,

    pub commute: CommuteScale,
    pub flood: FloodScale,
    pub pollution: PollutionScale,
    pub density: DensityScale,
    pub green: GreenScale,
}

/// Decides when a sub-score already present in a record wins over the
/// value computed from its raw measurement.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Any numeric value overrides, zero included.
    #[default]
    Presence,
    /// A numerically zero value counts as absent and is recomputed.
    Truthy,
}

impl OverridePolicy {
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            OverridePolicy::Presence => true,
            OverridePolicy::Truthy => value != 0.0,
        }
    }
}

/// Composite weights. Fractions of the final score, summing to 1.0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Weights {
    pub commute: f64,
    pub flood: f64,
    pub pollution: f64,
    pub density: f64,
    pub green: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.commute + self.flood + self.pollution + self.density + self.green
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            commute: 0.25,
            flood: 0.25,
            pollution: 0.20,
            density: 0.15,
            green: 0.15,
        }
    }
}

/// Commute scale: a free zone, then a linear penalty per extra minute.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommuteScale {
    /// Minutes that cost nothing (default: 10)
    pub free_minutes: f64,
    /// Points lost per minute beyond the free zone (default: 2)
    pub points_per_minute: f64,
    /// Minutes assumed when `commute_mins` is missing or malformed (default: 0)
    pub missing_minutes: f64,
}

impl Default for CommuteScale {
    fn default() -> Self {
        Self {
            free_minutes: 10.0,
            points_per_minute: 2.0,
            missing_minutes: 0.0,
        }
    }
}

/// Flood scale: zone `best_zone` scores 100, `worst_zone` scores 0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FloodScale {
    pub best_zone: f64,
    /// Also the value assumed for a missing zone
    pub worst_zone: f64,
}

impl Default for FloodScale {
    fn default() -> Self {
        Self {
            best_zone: 0.0,
            worst_zone: 3.0,
        }
    }
}

/// Pollution scale over aerosol optical depth, lower is better.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PollutionScale {
    pub aod_min: f64,
    /// Also the value assumed for a missing reading
    pub aod_max: f64,
}

impl Default for PollutionScale {
    fn default() -> Self {
        Self {
            aod_min: 0.02,
            aod_max: 0.6,
        }
    }
}

/// Density scale, people per km², lower is better.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DensityScale {
    /// Density that scores 0, also assumed when missing
    pub max_density: f64,
}

impl Default for DensityScale {
    fn default() -> Self {
        Self {
            max_density: 40000.0,
        }
    }
}

/// Greenery scale over NDVI, higher is better.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GreenScale {
    /// Also the value assumed for a missing reading
    pub ndvi_min: f64,
    pub ndvi_max: f64,
}

impl Default for GreenScale {
    fn default() -> Self {
        Self {
            ndvi_min: 0.0,
            ndvi_max: 0.6,
        }
    }
}
