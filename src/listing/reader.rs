use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use super::record::ListingRecord;

/// Listings read from one CSV file, plus its header row.
///
/// The header is kept so an empty table can still be written back with
/// the original columns.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    pub headers: Vec<String>,
    pub records: Vec<ListingRecord>,
}

/// Read listings from a CSV file with a header row
pub fn read_listings(path: &Path) -> Result<ListingTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open listings file at {}", path.display()))?;
    let table = read_listings_from(file)
        .with_context(|| format!("Failed to read listings from {}", path.display()))?;
    debug!(
        path = %path.display(),
        rows = table.records.len(),
        columns = table.headers.len(),
        "read listings"
    );
    Ok(table)
}

/// Read listings from any CSV source.
///
/// Every cell is kept as text. Rows shorter than the header get `null` for
/// the missing columns; cells beyond the header are dropped.
pub fn read_listings_from<R: Read>(source: R) -> Result<ListingTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Malformed CSV at data row {}", index + 1))?;

        if row.len() > headers.len() {
            warn!(
                row = index + 1,
                extra = row.len() - headers.len(),
                "dropping cells beyond the header width"
            );
        }

        let record: ListingRecord = headers
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let value = row
                    .get(col)
                    .map_or(Value::Null, |cell| Value::String(cell.to_string()));
                (name.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(ListingTable { headers, records })
}
