use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{ScoreSource, ScoredListing};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Display label for a listing, falling back to its 1-based row number
pub fn listing_label(listing: &ScoredListing, row: usize) -> String {
    listing
        .record
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| format!("row {}", row))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a label to fit available width, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked listings as a table: rank, composite score, label.
/// `ranked` pairs each listing with its 1-based input row.
pub fn format_ranked_table(ranked: &[(usize, &ScoredListing)], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No listings found.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4; // "  1."
    let score_width = 3; // "100"
    let separator = "  ";
    let fixed_width = rank_width + 1 + score_width + separator.len();

    ranked
        .iter()
        .enumerate()
        .map(|(idx, (row, listing))| {
            let rank_str = format!("{:>3}.", idx + 1);
            let score_str = format!("{:>width$}", listing.result.composite, width = score_width);
            let label = listing_label(listing, *row);
            let label = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_label(&label, width - fixed_width),
                Some(_) => truncate_label(&label, 20),
                None => label,
            };

            if use_colors {
                format!(
                    "{} {}{}{}",
                    rank_str.dimmed(),
                    colored_score(&score_str, listing.result.composite),
                    separator,
                    label
                )
            } else {
                format!("{} {}{}{}", rank_str, score_str, separator, label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn colored_score(text: &str, score: u8) -> String {
    match score {
        70..=100 => text.green().bold().to_string(),
        40..=69 => text.yellow().bold().to_string(),
        _ => text.red().bold().to_string(),
    }
}

/// Format ranked listings as tab-separated values for scripting
/// Columns: score, row, label (no headers, no colors)
pub fn format_tsv(ranked: &[(usize, &ScoredListing)]) -> String {
    ranked
        .iter()
        .map(|(row, listing)| {
            format!(
                "{}\t{}\t{}",
                listing.result.composite,
                row,
                listing_label(listing, *row)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a number for the breakdown, dropping a trailing ".00"
fn format_value(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.strip_suffix(".00").map(str::to_string).unwrap_or(text)
}

/// Multi-line breakdown of how one listing's composite was reached
pub fn format_breakdown(listing: &ScoredListing, row: usize, use_colors: bool) -> String {
    let label = listing_label(listing, row);
    let mut lines = Vec::with_capacity(listing.result.breakdown.len() + 2);

    lines.push(if use_colors {
        format!("{} (row {})", label.bold(), row)
    } else {
        format!("{} (row {})", label, row)
    });

    for contribution in &listing.result.breakdown {
        let factor = contribution.factor;
        let input = match contribution.raw {
            Some(raw) => format!("{} = {}", factor.raw_field(), format_value(raw)),
            None => format!("from {}", factor.score_field()),
        };
        let source = contribution.source.as_str();
        let source = if use_colors {
            match contribution.source {
                ScoreSource::Override => source.cyan().to_string(),
                ScoreSource::Measured => source.to_string(),
                ScoreSource::Defaulted => source.yellow().to_string(),
            }
        } else {
            source.to_string()
        };
        lines.push(format!(
            "  {:<10} {:>6} x {:.2} = {:>6}  [{}] {}",
            factor.label(),
            format_value(contribution.score),
            contribution.weight,
            format_value(contribution.contribution),
            source,
            input
        ));
    }

    let total = format!("Maplify score: {}", listing.result.composite);
    lines.push(if use_colors {
        format!("  {}", colored_score(&total, listing.result.composite))
    } else {
        format!("  {}", total)
    });

    lines.join("\n")
}
