//! GeoJSON reading operations.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{io::key_text, types::{Property, Record}};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    coordinates: Value,
}

/// Read a GeoJSON FeatureCollection from `path`. See `read_geojson_str`.
pub fn read_geojson(path: &Path, key_property: &str) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
    read_geojson_str(&text, key_property)
        .with_context(|| format!("[io::geojson::read] Failed to read GeoJSON from {:?}", path))
}

/// Read a GeoJSON FeatureCollection into records.
///
/// The key comes from the `key_property` property, falling back to the feature `id`.
/// Features without a key are skipped. Polygon and MultiPolygon geometries are kept;
/// other geometry types leave the record without geometry.
pub fn read_geojson_str(geojson: &str, key_property: &str) -> Result<Vec<Record>> {
    let collection: FeatureCollection = serde_json::from_str(geojson)
        .context("[io::geojson::read] Expected a GeoJSON FeatureCollection")?;

    let mut records = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let key = properties.get(key_property).and_then(key_text)
            .or_else(|| feature.id.as_ref().and_then(key_text));
        let Some(key) = key else {
            tracing::warn!("[io::geojson::read] Feature {} has no {:?} property or id; skipping", i, key_property);
            continue;
        };

        let mut record = Record::new(key);
        for (name, value) in &properties {
            record.properties.insert(name.clone(), Property::from_json(value));
        }
        record.geometry = match &feature.geometry {
            Some(geometry) => parse_geometry(geometry)
                .with_context(|| format!("[io::geojson::read] Invalid geometry on feature {}", i))?,
            None => None,
        };
        records.push(record);
    }

    tracing::debug!("[io::geojson::read] {} features", records.len());
    Ok(records)
}

fn parse_geometry(geometry: &Geometry) -> Result<Option<MultiPolygon<f64>>> {
    let coords = || geometry.coordinates.as_array()
        .ok_or_else(|| anyhow!("{} coordinates must be an array", geometry.ty));
    match geometry.ty.as_str() {
        "Polygon" => Ok(Some(MultiPolygon(vec![parse_polygon_coords(coords()?)?]))),
        "MultiPolygon" => {
            let polygons = coords()?.iter()
                .map(|p| parse_polygon_coords(p.as_array().ok_or_else(|| anyhow!("polygon must be an array"))?))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse GeoJSON polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        parse_ring_coords(ring.as_array().ok_or_else(|| anyhow!("ring must be an array"))?)
    });
    let Some(exterior) = rings.next() else { bail!("polygon has no exterior ring") };
    Ok(Polygon::new(exterior?, rings.collect::<Result<Vec<_>>>()?))
}

/// Parse a ring from GeoJSON coordinates: `[[x, y], [x, y], ...]`, closing it if needed.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for coord_pair in coords {
        let pair = coord_pair.as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
        let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}
