//! Format-specific reading and writing.
//!
//! - `csv` - attribute tables in, per-record classification out (polars)
//! - `geojson` - feature collections in and colored feature collections out
//! - `topojson` - topology objects in

mod csv;
mod geojson;
mod topojson;

pub use csv::*;
pub use geojson::*;
pub use topojson::*;

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{config::Config, types::Record};

/// Read region records from GeoJSON or TopoJSON text, telling them apart by the top-level `type`.
pub fn read_regions_str(text: &str, config: &Config) -> Result<Vec<Record>> {
    #[derive(Deserialize)]
    struct Kind {
        #[serde(rename = "type")]
        ty: String,
    }

    let kind: Kind = serde_json::from_str(text)
        .context("[io::read_regions] Expected a JSON object with a \"type\" member")?;
    match kind.ty.as_str() {
        "Topology" => read_topojson_str(text, config.topojson_object.as_deref(), &config.feature_key),
        "FeatureCollection" => read_geojson_str(text, &config.feature_key),
        other => bail!("[io::read_regions] Unsupported region data type {:?}", other),
    }
}

/// Read region records from a GeoJSON or TopoJSON file.
pub fn read_regions(path: &Path, config: &Config) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::read_regions] Failed to open {}", path.display()))?;
    read_regions_str(&text, config)
        .with_context(|| format!("[io::read_regions] Failed to read regions from {:?}", path))
}

/// Text form of a JSON key value. Integral numbers print without a fractional part;
/// empty strings and non-scalar values have no key.
pub(crate) fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Some(i.to_string()),
            (_, Some(u), _) => Some(u.to_string()),
            (_, _, Some(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            (_, _, Some(f)) => Some(f.to_string()),
            _ => None,
        },
        _ => None,
    }
}
