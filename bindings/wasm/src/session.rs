use std::collections::BTreeMap;

use anyhow::Result;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use choropleth_core::{
    io::{read_csv_str, read_regions_str, to_geojson},
    join_summary, Config, Session,
};

use crate::common::*;

#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
}

fn build_session(csv: &str, regions: &str, config: Option<String>) -> Result<Session> {
    let config = match config.as_deref() {
        Some(json) => Config::from_json_str(json)?,
        None => Config::default(),
    };
    let table = read_csv_str(csv, &config.csv_key, config.separator as u8)?;
    let mut records = read_regions_str(regions, &config)?;
    let attributes = if config.attributes.is_empty() { table.columns.clone() } else { config.attributes.clone() };
    join_summary(&mut records, &table.rows, &attributes);
    Session::new(records, attributes, config)
}

#[wasm_bindgen]
impl WasmSession {
    /// Build a session from CSV text, GeoJSON or TopoJSON text, and an optional JSON config.
    /// The first attribute is expressed.
    #[wasm_bindgen(constructor)]
    pub fn new(csv: &str, regions: &str, config: Option<String>) -> Result<WasmSession, JsValue> {
        let inner = build_session(csv, regions, config).map_err(js_err)?;
        Ok(WasmSession { inner })
    }

    /// Attribute names, in selection order.
    pub fn attributes(&self) -> Vec<String> {
        self.inner.attributes().to_vec()
    }

    /// Currently expressed attribute.
    pub fn expressed(&self) -> String {
        self.inner.expressed().to_string()
    }

    /// Express another attribute. Returns the new thresholds.
    pub fn select(&mut self, attribute: &str) -> Result<Vec<f64>, JsValue> {
        let classification = self.inner.select(attribute).map_err(js_err)?;
        Ok(classification.thresholds().to_vec())
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.inner.classification().thresholds().to_vec()
    }

    /// `{ key: fill }` for every region.
    pub fn colors(&self) -> Result<JsValue, JsValue> {
        let colors: BTreeMap<String, String> = self.inner.colors().into_iter()
            .map(|(key, color)| (key.to_string(), color))
            .collect();
        to_js(&colors)
    }

    /// `{ key: radius | null }` for every region.
    pub fn radii(&self) -> Result<JsValue, JsValue> {
        let radii: BTreeMap<String, Option<f64>> = self.inner.radii().into_iter()
            .map(|(key, radius)| (key.to_string(), radius))
            .collect();
        to_js(&radii)
    }

    pub fn legend(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legend())
    }

    pub fn bars(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.bars())
    }

    /// Colored GeoJSON FeatureCollection for the expressed attribute.
    #[wasm_bindgen(js_name = "to_geojson")]
    pub fn to_geojson(&self) -> Result<JsValue, JsValue> {
        let geojson = to_geojson(self.inner.records(), self.inner.classification(), &self.inner.config().feature_key);
        to_js_json(&geojson)
    }
}

/// Natural-breaks thresholds for `values` in `num_classes` classes. Non-finite values are ignored.
#[wasm_bindgen(js_name = "compute_breaks")]
pub fn compute_breaks(values: Vec<f64>, num_classes: usize) -> Result<Vec<f64>, JsValue> {
    choropleth_core::compute_breaks(&values, num_classes).map_err(js_err)
}
