//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::{classify::Classification, types::Record};

/// One row per record: key, expressed value, class index and fill color.
fn classified_frame(records: &[Record], classification: &Classification) -> Result<DataFrame> {
    let attribute = classification.attribute();
    let keys: Vec<String> = records.iter().map(|r| r.key.to_string()).collect();
    let values: Vec<Option<f64>> = records.iter()
        .map(|r| Some(r.value(attribute)).filter(|v| v.is_finite()))
        .collect();
    let classes: Vec<Option<u32>> = records.iter()
        .map(|r| classification.class_index(r.value(attribute)).map(|i| i as u32))
        .collect();
    let colors: Vec<String> = records.iter()
        .map(|r| classification.color_for(r).to_string())
        .collect();

    Ok(DataFrame::new(vec![
        Series::new("key".into(), keys).into(),
        Series::new(attribute.into(), values).into(),
        Series::new("class".into(), classes).into(),
        Series::new("fill".into(), colors).into(),
    ])?)
}

/// Write the per-record classification to a CSV file.
pub fn write_classified_csv(records: &[Record], classification: &Classification, path: &Path) -> Result<()> {
    let mut df = classified_frame(records, classification)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write the per-record classification to a CSV string (for WASM/browser use).
pub fn write_classified_csv_string(records: &[Record], classification: &Classification) -> Result<String> {
    let mut df = classified_frame(records, classification)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(&mut df)
        .context("[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .context("[io::csv::write] CSV output is not valid UTF-8")
}
