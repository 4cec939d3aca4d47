pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{coerce_number, measurement_or, Factor, Measurement};
pub use engine::{
    calculate_score, composite_score, enrich, rank_listings, score_listings, FactorContribution,
    ScoreResult, ScoreSource, ScoredListing, SubScores, MAPLIFY_FIELD,
};
pub use validation::validate_scoring;
