use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

pub const DEFAULT_INPUT: &str = "seed_listings.csv";
pub const DEFAULT_OUTPUT_JSON: &str = "seed_listings_scored.json";
pub const DEFAULT_OUTPUT_CSV: &str = "seed_listings_scored.csv";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub paths: Option<PathsConfig>,
}

/// File locations. Command-line flags take precedence over these.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output_json: Option<PathBuf>,
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
}

/// Fully resolved file locations for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output_json: PathBuf,
    pub output_csv: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_json: PathBuf::from(DEFAULT_OUTPUT_JSON),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
        }
    }
}

impl RunPaths {
    /// Layer: explicit flags, then config file, then built-in defaults
    pub fn resolve(flags: &PathsConfig, config: Option<&PathsConfig>) -> Self {
        let defaults = RunPaths::default();
        let pick = |flag: &Option<PathBuf>, file: Option<&PathBuf>, fallback: PathBuf| {
            flag.clone().or_else(|| file.cloned()).unwrap_or(fallback)
        };
        Self {
            input: pick(
                &flags.input,
                config.and_then(|c| c.input.as_ref()),
                defaults.input,
            ),
            output_json: pick(
                &flags.output_json,
                config.and_then(|c| c.output_json.as_ref()),
                defaults.output_json,
            ),
            output_csv: pick(
                &flags.output_csv,
                config.and_then(|c| c.output_csv.as_ref()),
                defaults.output_csv,
            ),
        }
    }
}
