use serde_json::Value;

use super::config::{
    CommuteScale, DensityScale, FloodScale, GreenScale, PollutionScale, ScoringConfig, Weights,
};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// The five livability factors, in composite order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Commute,
    Flood,
    Pollution,
    Density,
    Green,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Commute,
        Factor::Flood,
        Factor::Pollution,
        Factor::Density,
        Factor::Green,
    ];

    /// Column holding the raw measurement
    pub fn raw_field(self) -> &'static str {
        match self {
            Factor::Commute => "commute_mins",
            Factor::Flood => "flood_zone",
            Factor::Pollution => "aod",
            Factor::Density => "density_per_km2",
            Factor::Green => "ndvi",
        }
    }

    /// Column holding the (possibly pre-computed) sub-score
    pub fn score_field(self) -> &'static str {
        match self {
            Factor::Commute => "commute_score",
            Factor::Flood => "flood_score",
            Factor::Pollution => "pollution_score",
            Factor::Density => "density_score",
            Factor::Green => "green_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Factor::Commute => "Commute",
            Factor::Flood => "Flood",
            Factor::Pollution => "Pollution",
            Factor::Density => "Density",
            Factor::Green => "Green",
        }
    }

    pub fn weight(self, weights: &Weights) -> f64 {
        match self {
            Factor::Commute => weights.commute,
            Factor::Flood => weights.flood,
            Factor::Pollution => weights.pollution,
            Factor::Density => weights.density,
            Factor::Green => weights.green,
        }
    }

    /// Raw value assumed when the measurement is missing or malformed.
    /// Worst case of each scale, except commute which assumes no travel.
    pub fn default_raw(self, config: &ScoringConfig) -> f64 {
        match self {
            Factor::Commute => config.commute.missing_minutes,
            Factor::Flood => config.flood.worst_zone,
            Factor::Pollution => config.pollution.aod_max,
            Factor::Density => config.density.max_density,
            Factor::Green => config.green.ndvi_min,
        }
    }

    /// Map a raw measurement onto the factor's [0, 100] scale.
    pub fn normalize(self, raw: f64, config: &ScoringConfig) -> f64 {
        match self {
            Factor::Commute => commute_score(raw, &config.commute),
            Factor::Flood => flood_score(raw, &config.flood),
            Factor::Pollution => pollution_score(raw, &config.pollution),
            Factor::Density => density_score(raw, &config.density),
            Factor::Green => green_score(raw, &config.green),
        }
    }
}

/// A raw measurement after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Parsed from the record
    Observed(f64),
    /// Missing or malformed, replaced by the factor default
    Defaulted(f64),
}

impl Measurement {
    pub fn value(&self) -> f64 {
        match self {
            Measurement::Observed(v) | Measurement::Defaulted(v) => *v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Measurement::Defaulted(_))
    }
}

/// Best-effort numeric coercion of a record value.
///
/// Text is trimmed before parsing. Empty text, `null`, booleans, anything
/// that does not parse and NaN all yield `None`. Infinities are kept and
/// left to the final clamp.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    if parsed.is_nan() {
        None
    } else {
        Some(parsed)
    }
}

/// Coerce a record value, substituting `default` when it is not numeric.
pub fn measurement_or(value: Option<&Value>, default: f64) -> Measurement {
    match coerce_number(value) {
        Some(v) => Measurement::Observed(v),
        None => Measurement::Defaulted(default),
    }
}

pub fn clamp_score(score: f64) -> f64 {
    score.max(MIN_SCORE).min(MAX_SCORE)
}

pub fn commute_score(minutes: f64, scale: &CommuteScale) -> f64 {
    let over = (minutes - scale.free_minutes).max(0.0);
    clamp_score(MAX_SCORE - over * scale.points_per_minute)
}

pub fn flood_score(zone: f64, scale: &FloodScale) -> f64 {
    let span = scale.worst_zone - scale.best_zone;
    clamp_score((scale.worst_zone - zone) / span * MAX_SCORE)
}

pub fn pollution_score(aod: f64, scale: &PollutionScale) -> f64 {
    let span = scale.aod_max - scale.aod_min;
    clamp_score((1.0 - (aod - scale.aod_min) / span) * MAX_SCORE)
}

pub fn density_score(density: f64, scale: &DensityScale) -> f64 {
    clamp_score(MAX_SCORE - (density / scale.max_density) * MAX_SCORE)
}

pub fn green_score(ndvi: f64, scale: &GreenScale) -> f64 {
    let span = scale.ndvi_max - scale.ndvi_min;
    clamp_score((ndvi - scale.ndvi_min) / span * MAX_SCORE)
}
