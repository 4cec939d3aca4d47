use serde_json::Value;
use tracing::{debug, debug_span, warn};

use super::config::{OverridePolicy, ScoringConfig, Weights};
use super::factors::{clamp_score, coerce_number, measurement_or, Factor, MAX_SCORE, MIN_SCORE};
use crate::listing::ListingRecord;

/// Column the composite is written to
pub const MAPLIFY_FIELD: &str = "maplify_score";

/// Where a sub-score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Taken from the record's own score column
    Override,
    /// Computed from a parsed raw measurement
    Measured,
    /// Computed from the factor's default because the measurement was unusable
    Defaulted,
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Override => "override",
            ScoreSource::Measured => "measured",
            ScoreSource::Defaulted => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FactorContribution {
    pub factor: Factor,
    pub source: ScoreSource,
    pub raw: Option<f64>,     // Measurement fed to the scale, None for overrides
    pub score: f64,           // Sub-score in [0, 100], two decimals
    pub weight: f64,
    pub contribution: f64,    // score * weight
}

/// The five sub-scores, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub commute: f64,
    pub flood: f64,
    pub pollution: f64,
    pub density: f64,
    pub green: f64,
}

impl SubScores {
    pub fn uniform(score: f64) -> Self {
        Self {
            commute: score,
            flood: score,
            pollution: score,
            density: score,
            green: score,
        }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Commute => self.commute,
            Factor::Flood => self.flood,
            Factor::Pollution => self.pollution,
            Factor::Density => self.density,
            Factor::Green => self.green,
        }
    }

    fn set(&mut self, factor: Factor, score: f64) {
        match factor {
            Factor::Commute => self.commute = score,
            Factor::Flood => self.flood = score,
            Factor::Pollution => self.pollution = score,
            Factor::Density => self.density = score,
            Factor::Green => self.green = score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub sub_scores: SubScores,
    pub composite: u8,
    pub breakdown: Vec<FactorContribution>,
}

/// A listing after enrichment, with the result that produced it
#[derive(Debug, Clone)]
pub struct ScoredListing {
    pub record: ListingRecord,
    pub result: ScoreResult,
}

pub fn calculate_score(record: &ListingRecord, config: &ScoringConfig) -> ScoreResult {
    let mut sub_scores = SubScores::uniform(MIN_SCORE);
    let mut breakdown = Vec::with_capacity(Factor::ALL.len());

    for factor in Factor::ALL {
        let (source, raw, score) = match override_score(record, factor, config.override_policy) {
            Some(score) => (ScoreSource::Override, None, score),
            None => {
                let measurement =
                    measurement_or(record.get(factor.raw_field()), factor.default_raw(config));
                let source = if measurement.is_default() {
                    debug!(field = factor.raw_field(), default = measurement.value(), "using default measurement");
                    ScoreSource::Defaulted
                } else {
                    ScoreSource::Measured
                };
                let raw = measurement.value();
                (source, Some(raw), factor.normalize(raw, config))
            }
        };

        // The composite is built from the values that get written out, so
        // re-scoring an enriched record reproduces it exactly.
        let score = round_score(score);
        let weight = factor.weight(&config.weights);
        sub_scores.set(factor, score);
        breakdown.push(FactorContribution {
            factor,
            source,
            raw,
            score,
            weight,
            contribution: score * weight,
        });
    }

    ScoreResult {
        composite: composite_score(&sub_scores, &config.weights),
        sub_scores,
        breakdown,
    }
}

/// Pre-computed sub-score carried by the record, if the policy accepts it.
/// Values outside [0, 100] are clamped.
fn override_score(record: &ListingRecord, factor: Factor, policy: OverridePolicy) -> Option<f64> {
    let value = record.get(factor.score_field())?;
    let Some(score) = coerce_number(Some(value)) else {
        if !is_blank(value) {
            warn!(field = factor.score_field(), value = %value, "ignoring non-numeric score override");
        }
        return None;
    };
    if !policy.accepts(score) {
        debug!(field = factor.score_field(), "zero override treated as absent");
        return None;
    }
    let clamped = clamp_score(score);
    if clamped != score {
        warn!(field = factor.score_field(), value = score, clamped, "score override out of range");
    }
    Some(clamped)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Weighted composite, rounded half-to-even and clamped to [0, 100]
pub fn composite_score(sub_scores: &SubScores, weights: &Weights) -> u8 {
    let total: f64 = Factor::ALL
        .iter()
        .map(|&factor| sub_scores.get(factor) * factor.weight(weights))
        .sum();
    total.round_ties_even().clamp(MIN_SCORE, MAX_SCORE) as u8
}

/// Round to two decimals, ties to even
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round_ties_even() / 100.0
}

/// Write the sub-scores and the composite into the record.
/// Existing columns are overwritten in place; new ones are appended in
/// factor order, composite last.
pub fn enrich(record: &mut ListingRecord, result: &ScoreResult) {
    for factor in Factor::ALL {
        record.set(factor.score_field(), Value::from(result.sub_scores.get(factor)));
    }
    record.set(MAPLIFY_FIELD, Value::from(result.composite));
}

/// Score and enrich every listing, in input order
pub fn score_listings(records: Vec<ListingRecord>, config: &ScoringConfig) -> Vec<ScoredListing> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            let _span = debug_span!("listing", row = index + 1).entered();
            let result = calculate_score(&record, config);
            enrich(&mut record, &result);
            ScoredListing { record, result }
        })
        .collect()
}

/// Listings with their 1-based input position, best composite first.
/// Ties keep input order.
pub fn rank_listings(scored: &[ScoredListing]) -> Vec<(usize, &ScoredListing)> {
    let mut ranked: Vec<_> = scored.iter().enumerate().map(|(i, s)| (i + 1, s)).collect();
    ranked.sort_by(|a, b| b.1.result.composite.cmp(&a.1.result.composite));
    ranked
}
