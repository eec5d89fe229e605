//! Token-holder CSV ingestion.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{AirdropError, Result};

/// Default header of the holder address column.
pub const DEFAULT_ADDRESS_COLUMN: &str = "HolderAddress";
/// Default header of the balance column.
pub const DEFAULT_BALANCE_COLUMN: &str = "Balance";

/// One data row, fields trimmed but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub account: String,
    pub balance: String,
}

/// Header names of the columns to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub address: String,
    pub balance: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS_COLUMN.to_string(),
            balance: DEFAULT_BALANCE_COLUMN.to_string(),
        }
    }
}

/// Reads every data row of the CSV file at `path`.
pub fn read_records(path: &Path, columns: &Columns) -> Result<Vec<RawRecord>> {
    info!(path = %path.display(), "reading token holders");
    let file = File::open(path)?;
    read_records_from(file, columns)
}

/// Reads every data row from any CSV source with a header line.
pub fn read_records_from<R: Read>(reader: R, columns: &Columns) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let address_index = column_index(&headers, &columns.address)?;
    let balance_index = column_index(&headers, &columns.balance)?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        // Whitespace-only lines trim down to a single empty field.
        if record.iter().all(str::is_empty) {
            continue;
        }
        let field = |index: usize| {
            record.get(index).map(str::to_string).ok_or_else(|| {
                AirdropError::Input(format!(
                    "row {}: expected at least {} fields, got {}",
                    row + 1,
                    index + 1,
                    record.len()
                ))
            })
        };
        records.push(RawRecord {
            account: field(address_index)?,
            balance: field(balance_index)?,
        });
    }

    debug!(rows = records.len(), "parsed csv rows");
    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| AirdropError::Input(format!("missing column {name:?}")))
}
