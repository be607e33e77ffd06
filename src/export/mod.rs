//! Spreadsheet export.
//!
//! One-shot CSV write at the end of a run: a header row followed by one
//! row per record, six columns in model order. No append mode.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Precedent;

/// Write `records` to `path` as a CSV spreadsheet.
pub fn write_spreadsheet(path: &Path, records: &[Precedent]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(Precedent::COLUMNS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush().context("failed to flush output file")?;

    Ok(())
}
