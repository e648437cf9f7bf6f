//! GeoJSON writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use geo::MultiPolygon;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{classify::Classification, types::Record};

/// Export records as a FeatureCollection colored by `classification`.
///
/// Each feature keeps its properties and gains `fill` (the class color) and `class`
/// (the class index, `null` for missing data). Missing values are written as `null`.
pub fn to_geojson(records: &[Record], classification: &Classification, key_property: &str) -> Value {
    let features: Vec<Value> = records.iter().map(|record| {
        let mut properties: Map<String, Value> = record.properties.iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        properties.insert(key_property.to_string(), json!(record.key.as_str()));

        let value = record.value(classification.attribute());
        properties.insert("fill".to_string(), json!(classification.color(value)));
        properties.insert("class".to_string(), json!(classification.class_index(value)));

        json!({
            "type": "Feature",
            "id": record.key.as_str(),
            "geometry": record.geometry.as_ref().map_or(Value::Null, multipolygon_to_geojson),
            "properties": properties,
        })
    }).collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Helper to convert a MultiPolygon to a serde_json::Value representing GeoJSON Geometry.
fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = mp.0.iter().map(|polygon| {
        let mut rings = vec![polygon.exterior()];
        rings.extend(polygon.interiors());
        let rings: Vec<Vec<[f64; 2]>> = rings.iter()
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect();
        json!(rings)
    }).collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

/// Serialize any value (GeoJSON, legend, chart) as JSON to `path`.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::geojson::write] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("[io::geojson::write] Failed to write JSON to {:?}", path))?;
    writer.flush()
        .with_context(|| format!("[io::geojson::write] Failed to flush {:?}", path))
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use crate::{color::MISSING_COLOR, io::read_geojson_str};

    use super::*;

    #[test]
    fn features_carry_fill_and_class() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let mut a = Record::new("08001").with_geometry(MultiPolygon(vec![square]));
        a.set("pop", 12.0);
        let mut b = Record::new("08003");
        b.set("pop", f64::NAN);

        let classification = Classification::new("pop", vec![10.0], vec!["#aaaaaa".into(), "#000000".into()], MISSING_COLOR).unwrap();
        let value = to_geojson(&[a, b], &classification, "countyFIPS");

        let features = value["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["fill"], "#000000");
        assert_eq!(features[0]["properties"]["class"], 1);
        assert_eq!(features[0]["properties"]["countyFIPS"], "08001");
        assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
        assert_eq!(features[1]["properties"]["fill"], MISSING_COLOR);
        assert!(features[1]["properties"]["class"].is_null());
        assert!(features[1]["properties"]["pop"].is_null());
        assert!(features[1]["geometry"].is_null());

        // The export reads back with the same keys and geometry.
        let back = read_geojson_str(&value.to_string(), "countyFIPS").unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].geometry.as_ref().unwrap().0[0].exterior().0.len(), 5);
    }

    #[test]
    fn writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&json!({ "a": 1 }), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, r#"{"a":1}"#);
    }
}
