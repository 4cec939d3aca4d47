use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::listing::ListingRecord;

/// Serialize enriched listings as a pretty-printed JSON array
pub fn write_json_to<W: Write>(mut sink: W, records: &[ListingRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut sink, records).context("Failed to serialize listings")?;
    sink.write_all(b"\n")?;
    Ok(())
}

/// Column order for tabular output: the first record's fields, or the
/// input header row when there are no records.
pub fn output_columns(records: &[ListingRecord], input_headers: &[String]) -> Vec<String> {
    match records.first() {
        Some(first) => first.field_names().map(str::to_string).collect(),
        None => input_headers.to_vec(),
    }
}

/// Write listings as CSV to any sink
pub fn write_csv_to<W: Write>(sink: W, columns: &[String], records: &[ListingRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(columns).context("Failed to write CSV header")?;
    for (index, record) in records.iter().enumerate() {
        writer
            .write_record(columns.iter().map(|column| record.cell(column)))
            .with_context(|| format!("Failed to write CSV row {}", index + 1))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn open_staged(path: &Path) -> Result<AtomicWriteFile> {
    AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))
}

/// Save the JSON and CSV outputs together.
///
/// Both files are fully written to staging files before either is
/// committed, so a failure while producing one leaves both targets untouched.
pub fn write_outputs(
    json_path: &Path,
    csv_path: &Path,
    records: &[ListingRecord],
    input_headers: &[String],
) -> Result<()> {
    let columns = output_columns(records, input_headers);

    let mut json_file = open_staged(json_path)?;
    write_json_to(&mut json_file, records)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let mut csv_file = open_staged(csv_path)?;
    write_csv_to(&mut csv_file, &columns, records)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    json_file
        .commit()
        .with_context(|| format!("Failed to save {}", json_path.display()))?;
    csv_file
        .commit()
        .with_context(|| format!("Failed to save {}", csv_path.display()))?;

    debug!(
        json = %json_path.display(),
        csv = %csv_path.display(),
        rows = records.len(),
        columns = columns.len(),
        "wrote outputs"
    );
    Ok(())
}
