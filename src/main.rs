use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use maplify::config::{PathsConfig, RunPaths};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score the input and write the JSON and CSV outputs (default if no subcommand)
    Score,
    /// Print listings ranked by maplify score, without writing files
    Rank {
        /// Show only the top N listings
        #[arg(short, long)]
        limit: Option<usize>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show how one listing's score was computed
    Explain {
        /// Row number of the listing (1-based, in input order)
        index: usize,
    },
    /// Print the effective scoring configuration as YAML
    ShowConfig,
}

#[derive(Parser, Debug)]
#[command(name = "maplify")]
#[command(about = "Compute MAPLIFY livability scores for listing CSVs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/maplify/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Input CSV [default: seed_listings.csv]
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output JSON [default: seed_listings_scored.json]
    #[arg(long, global = true)]
    output_json: Option<PathBuf>,

    /// Output CSV [default: seed_listings_scored.csv]
    #[arg(long, global = true)]
    output_csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "maplify=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Score);
    let start_time = Instant::now();

    // Load config
    let config = match maplify::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let effective_scoring = config.scoring.unwrap_or_default();
    if let Err(errors) = maplify::scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let flags = PathsConfig {
        input: cli.input,
        output_json: cli.output_json,
        output_csv: cli.output_csv,
    };
    let paths = RunPaths::resolve(&flags, config.paths.as_ref());
    debug!(?paths, "resolved paths");

    match command {
        Commands::Score => {
            if let Err(e) = maplify::run(&paths, &effective_scoring) {
                eprintln!("Error: {:#}", e);
                std::process::exit(EXIT_IO);
            }
            println!(
                "Wrote {} and {}",
                paths.output_json.display(),
                paths.output_csv.display()
            );
        }
        Commands::Rank { limit, tsv } => {
            let scored = match maplify::score_file(&paths.input, &effective_scoring) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };

            let mut ranked = maplify::scoring::rank_listings(&scored.listings);
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }

            if tsv {
                let output = maplify::output::format_tsv(&ranked);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else {
                let use_colors = maplify::output::should_use_colors();
                println!(
                    "{}",
                    maplify::output::format_ranked_table(&ranked, use_colors)
                );
            }
        }
        Commands::Explain { index } => {
            let scored = match maplify::score_file(&paths.input, &effective_scoring) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };

            // Validate index bounds (1-based)
            if index < 1 || index > scored.listings.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    scored.listings.len()
                );
                std::process::exit(EXIT_USAGE);
            }

            let use_colors = maplify::output::should_use_colors();
            println!(
                "{}",
                maplify::output::format_breakdown(&scored.listings[index - 1], index, use_colors)
            );
        }
        Commands::ShowConfig => match serde_saphyr::to_string(&effective_scoring) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Failed to render config: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
