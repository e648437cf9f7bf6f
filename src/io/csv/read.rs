//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path, sync::Arc};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType}};

use crate::types::Row;

/// Attribute table: rows keyed by region plus the non-key column names in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

fn csv_options(separator: u8) -> CsvReadOptions {
    // Every column is read as text: keys keep leading zeros and values are parsed at join time.
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(separator))
        .with_infer_schema_length(Some(0))
}

/// Reads a delimited file at `path` into a `Table`, keyed by `key_column`.
pub fn read_csv(path: &Path, key_column: &str, separator: u8) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    let df = csv_options(separator)
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))?;
    table_from_frame(&df, key_column)
}

/// Reads delimited text (for WASM/browser use).
pub fn read_csv_str(csv: &str, key_column: &str, separator: u8) -> Result<Table> {
    read_csv_bytes(csv.as_bytes(), key_column, separator)
}

/// Reads delimited UTF-8 bytes, e.g. a fetched or uploaded file.
pub fn read_csv_bytes(bytes: &[u8], key_column: &str, separator: u8) -> Result<Table> {
    let df = csv_options(separator)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("[io::csv::read] Failed to read CSV from memory")?;
    table_from_frame(&df, key_column)
}

/// Convert a string-typed frame into rows. Rows with an empty key are skipped.
fn table_from_frame(df: &DataFrame, key_column: &str) -> Result<Table> {
    let keys = df.column(key_column)
        .with_context(|| format!("[io::csv::read] Key column {:?} not found", key_column))?
        .cast(&DataType::String)?;
    let keys = keys.str()?;

    let columns: Vec<String> = df.get_column_names().into_iter()
        .map(|name| name.to_string())
        .filter(|name| name != key_column)
        .collect();
    let values = columns.iter()
        .map(|name| Ok(df.column(name)?.cast(&DataType::String)?))
        .collect::<Result<Vec<_>>>()?;
    let values = values.iter()
        .map(|col| Ok(col.str()?))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(key) = keys.get(i).map(str::trim).filter(|k| !k.is_empty()) else {
            tracing::warn!("[io::csv::read] Skipping row {} with an empty {} value", i + 1, key_column);
            continue;
        };
        let mut row = Row::new(key);
        for (name, col) in columns.iter().zip(&values) {
            row.values.insert(name.clone(), col.get(i).filter(|v| !v.is_empty()).map(Arc::from));
        }
        rows.push(row);
    }

    tracing::debug!("[io::csv::read] {} rows, {} attribute columns", rows.len(), columns.len());
    Ok(Table { columns, rows })
}
