pub mod config;
pub mod listing;
pub mod output;
pub mod scoring;

use anyhow::Result;
use std::path::Path;
use tracing::info;

use config::RunPaths;
use scoring::{ScoreSource, ScoredListing, ScoringConfig};

/// Scored listings from one input file, with the input header row
#[derive(Debug, Clone)]
pub struct ScoredTable {
    pub headers: Vec<String>,
    pub listings: Vec<ScoredListing>,
}

/// Counts reported after a scoring run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub overrides: usize,
    pub defaulted: usize,
}

impl RunSummary {
    fn from_listings(listings: &[ScoredListing]) -> Self {
        let mut summary = RunSummary {
            rows: listings.len(),
            ..RunSummary::default()
        };
        for contribution in listings.iter().flat_map(|l| &l.result.breakdown) {
            match contribution.source {
                ScoreSource::Override => summary.overrides += 1,
                ScoreSource::Defaulted => summary.defaulted += 1,
                ScoreSource::Measured => {}
            }
        }
        summary
    }
}

/// Read and score every listing in a CSV file
pub fn score_file(input: &Path, config: &ScoringConfig) -> Result<ScoredTable> {
    let table = listing::read_listings(input)?;
    let listings = scoring::score_listings(table.records, config);
    Ok(ScoredTable {
        headers: table.headers,
        listings,
    })
}

/// Score the input file and write both outputs.
///
/// Neither output is replaced unless both could be written.
pub fn run(paths: &RunPaths, config: &ScoringConfig) -> Result<RunSummary> {
    let scored = score_file(&paths.input, config)?;
    let records: Vec<_> = scored.listings.iter().map(|l| l.record.clone()).collect();

    output::write_outputs(
        &paths.output_json,
        &paths.output_csv,
        &records,
        &scored.headers,
    )?;

    let summary = RunSummary::from_listings(&scored.listings);
    info!(
        rows = summary.rows,
        overrides = summary.overrides,
        defaulted = summary.defaulted,
        "scored listings"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingRecord;
    use serde_json::json;
    use std::env;
    use std::fs;

    struct TempRun {
        paths: RunPaths,
    }

    impl TempRun {
        fn new(name: &str, input: &str) -> Self {
            let dir = env::temp_dir();
            let paths = RunPaths {
                input: dir.join(format!("maplify_{}_in.csv", name)),
                output_json: dir.join(format!("maplify_{}_out.json", name)),
                output_csv: dir.join(format!("maplify_{}_out.csv", name)),
            };
            fs::write(&paths.input, input).unwrap();
            Self { paths }
        }

        fn read(path: &Path) -> String {
            fs::read_to_string(path).unwrap()
        }
    }

    impl Drop for TempRun {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.paths.input);
            let _ = fs::remove_file(&self.paths.output_json);
            let _ = fs::remove_file(&self.paths.output_csv);
        }
    }

    #[test]
    fn test_run_writes_both_outputs() {
        let run_files = TempRun::new(
            "full",
            "id,commute_mins,flood_zone,aod,density_per_km2,ndvi\n\
             L1,25,1,0.12,8000,0.42\n\
             L2,,unknown,,,\n",
        );

        let summary = run(&run_files.paths, &ScoringConfig::default()).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.overrides, 0);
        assert_eq!(summary.defaulted, 5);

        let json = TempRun::read(&run_files.paths.output_json);
        let records: Vec<ListingRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&json!("L1")));
        assert_eq!(records[0].get("maplify_score"), Some(&json!(73)));
        assert_eq!(records[1].get("flood_zone"), Some(&json!("unknown")));
        assert_eq!(records[1].get("maplify_score"), Some(&json!(25)));

        let csv = TempRun::read(&run_files.paths.output_csv);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "id,commute_mins,flood_zone,aod,density_per_km2,ndvi,\
                 commute_score,flood_score,pollution_score,density_score,green_score,maplify_score"
            )
        );
        assert_eq!(
            lines.next(),
            Some("L1,25,1,0.12,8000,0.42,70.0,66.67,82.76,80.0,70.0,73")
        );
        assert_eq!(lines.next(), Some("L2,,unknown,,,,100.0,0.0,0.0,0.0,0.0,25"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_run_respects_overrides() {
        let run_files = TempRun::new(
            "override",
            "id,commute_mins,commute_score,maplify_score\nL1,90,88,\n",
        );

        let summary = run(&run_files.paths, &ScoringConfig::default()).unwrap();
        assert_eq!(summary.overrides, 1);

        let csv = TempRun::read(&run_files.paths.output_csv);
        let mut lines = csv.lines();
        // Existing score columns keep their position
        assert_eq!(
            lines.next(),
            Some(
                "id,commute_mins,commute_score,maplify_score,\
                 flood_score,pollution_score,density_score,green_score"
            )
        );
        assert_eq!(lines.next(), Some("L1,90,88.0,22,0.0,0.0,0.0,0.0"));
    }

    #[test]
    fn test_run_empty_input() {
        let run_files = TempRun::new("empty", "id,commute_mins,aod\n");

        let summary = run(&run_files.paths, &ScoringConfig::default()).unwrap();
        assert_eq!(summary.rows, 0);
        assert_eq!(TempRun::read(&run_files.paths.output_json).trim(), "[]");
        assert_eq!(TempRun::read(&run_files.paths.output_csv), "id,commute_mins,aod\n");
    }

    #[test]
    fn test_run_missing_input_fails() {
        let dir = env::temp_dir();
        let paths = RunPaths {
            input: dir.join("maplify_missing_input.csv"),
            output_json: dir.join("maplify_missing_out.json"),
            output_csv: dir.join("maplify_missing_out.csv"),
        };
        let _ = fs::remove_file(&paths.input);

        assert!(run(&paths, &ScoringConfig::default()).is_err());
        assert!(!paths.output_json.exists());
    }

    #[test]
    fn test_run_unwritable_csv_writes_no_json() {
        let mut run_files = TempRun::new("unwritable_csv", "id,commute_mins\nL1,25\n");
        let _ = fs::remove_file(&run_files.paths.output_json);
        run_files.paths.output_csv = env::temp_dir().join("maplify_no_such_dir").join("out.csv");

        assert!(run(&run_files.paths, &ScoringConfig::default()).is_err());
        assert!(!run_files.paths.output_json.exists());
    }

    #[test]
    fn test_rerun_on_output_is_stable() {
        let run_files = TempRun::new(
            "rerun",
            "id,commute_mins,flood_zone,aod,density_per_km2,ndvi\nL1,25,1,0.12,8000,0.42\n",
        );
        run(&run_files.paths, &ScoringConfig::default()).unwrap();
        let first = TempRun::read(&run_files.paths.output_csv);

        let second_run = TempRun::new("rerun_second", &first);
        run(&second_run.paths, &ScoringConfig::default()).unwrap();
        let second = TempRun::read(&second_run.paths.output_csv);

        assert_eq!(first, second);
    }
}
