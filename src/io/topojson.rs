//! TopoJSON reading: decode one topology object into records.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{io::key_text, types::{Property, Record}};

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    objects: BTreeMap<String, TopoGeometry>,
}

/// Quantization transform: `real = quantized * scale + translate`.
#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    arcs: Value,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Arcs with absolute coordinates.
struct Arcs(Vec<Vec<Coord<f64>>>);

impl Arcs {
    /// Undo delta encoding and quantization (when a transform is present).
    fn decode(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Result<Self> {
        let decoded = arcs.iter().enumerate().map(|(a, arc)| {
            let (mut qx, mut qy) = (0.0, 0.0);
            arc.iter().map(|position| {
                ensure!(position.len() >= 2, "arc {} has a position with fewer than two coordinates", a);
                Ok(match transform {
                    Some(t) => {
                        qx += position[0];
                        qy += position[1];
                        Coord { x: qx * t.scale[0] + t.translate[0], y: qy * t.scale[1] + t.translate[1] }
                    }
                    None => Coord { x: position[0], y: position[1] },
                })
            }).collect::<Result<Vec<_>>>()
        }).collect::<Result<Vec<_>>>()?;
        Ok(Self(decoded))
    }

    /// Stitch arcs into a closed ring. A negative index `i` is arc `!i` traversed backwards;
    /// consecutive arcs share their joining point, which is kept once.
    fn ring(&self, indices: &[i64]) -> Result<LineString<f64>> {
        let mut points: Vec<Coord<f64>> = Vec::new();
        for &index in indices {
            let (i, reversed) = if index >= 0 { (index as usize, false) } else { ((!index) as usize, true) };
            let arc = self.0.get(i).ok_or_else(|| anyhow!("arc index {} out of range ({} arcs)", index, self.0.len()))?;
            let skip = usize::from(!points.is_empty());
            if reversed {
                points.extend(arc.iter().rev().skip(skip));
            } else {
                points.extend(arc.iter().skip(skip));
            }
        }
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last { points.push(first) }
        }
        Ok(LineString(points))
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon<f64>> {
        let Some((exterior, holes)) = rings.split_first() else { bail!("polygon has no rings") };
        let holes = holes.iter().map(|r| self.ring(r)).collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(self.ring(exterior)?, holes))
    }

    fn geometry(&self, geometry: &TopoGeometry) -> Result<Option<MultiPolygon<f64>>> {
        match geometry.ty.as_str() {
            "Polygon" => {
                let rings: Vec<Vec<i64>> = serde_json::from_value(geometry.arcs.clone())
                    .context("Polygon arcs must be an array of rings")?;
                Ok(Some(MultiPolygon(vec![self.polygon(&rings)?])))
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Vec<i64>>> = serde_json::from_value(geometry.arcs.clone())
                    .context("MultiPolygon arcs must be an array of polygons")?;
                let polygons = polygons.iter().map(|p| self.polygon(p)).collect::<Result<Vec<_>>>()?;
                Ok(Some(MultiPolygon(polygons)))
            }
            _ => Ok(None),
        }
    }
}

/// Read a TopoJSON file from `path`. See `read_topojson_str`.
pub fn read_topojson(path: &Path, object: Option<&str>, key_property: &str) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::topojson] Failed to open TopoJSON file: {}", path.display()))?;
    read_topojson_str(&text, object, key_property)
        .with_context(|| format!("[io::topojson] Failed to read TopoJSON from {:?}", path))
}

/// Convert the TopoJSON object `object` into records (the only object when `None`).
///
/// A GeometryCollection yields one record per member geometry. Keys come from the
/// `key_property` property, falling back to the geometry `id`; geometries without a key are skipped.
pub fn read_topojson_str(topojson: &str, object: Option<&str>, key_property: &str) -> Result<Vec<Record>> {
    let topology: Topology = serde_json::from_str(topojson)
        .context("[io::topojson] Expected a TopoJSON topology")?;
    ensure!(topology.ty == "Topology", "[io::topojson] Expected type \"Topology\", found {:?}", topology.ty);

    let names = || topology.objects.keys().cloned().collect::<Vec<_>>().join(", ");
    let (name, root) = match object {
        Some(name) => {
            let root = topology.objects.get(name)
                .ok_or_else(|| anyhow!("[io::topojson] Object {:?} not found. Available: {}", name, names()))?;
            (name, root)
        }
        None => {
            ensure!(topology.objects.len() == 1,
                "[io::topojson] Topology has {} objects; choose one of: {}", topology.objects.len(), names());
            let (name, root) = topology.objects.iter().next()
                .ok_or_else(|| anyhow!("[io::topojson] Topology has no objects"))?;
            (name.as_str(), root)
        }
    };

    let arcs = Arcs::decode(&topology.arcs, topology.transform)?;
    let members: Vec<&TopoGeometry> = match root.ty.as_str() {
        "GeometryCollection" => root.geometries.iter().collect(),
        _ => vec![root],
    };

    let mut records = Vec::with_capacity(members.len());
    for (i, geometry) in members.into_iter().enumerate() {
        let properties = geometry.properties.as_ref();
        let key = properties.and_then(|p| p.get(key_property)).and_then(key_text)
            .or_else(|| geometry.id.as_ref().and_then(key_text));
        let Some(key) = key else {
            tracing::warn!("[io::topojson] Geometry {} of {} has no {:?} property or id; skipping", i, name, key_property);
            continue;
        };

        let mut record = Record::new(key);
        for (prop, value) in properties.into_iter().flatten() {
            record.properties.insert(prop.clone(), Property::from_json(value));
        }
        record.geometry = arcs.geometry(geometry)
            .with_context(|| format!("[io::topojson] Invalid geometry {} of {}", i, name))?;
        records.push(record);
    }

    tracing::debug!("[io::topojson] {} geometries from object {}", records.len(), name);
    Ok(records)
}
