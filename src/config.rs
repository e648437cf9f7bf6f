//! Pipeline configuration, loaded from JSON.

use std::{fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{chart::ChartConfig, color::{same_color, Ramp, Rgb, MISSING_COLOR}};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region key column in the attribute table.
    pub csv_key: String,
    /// Region key property on geographic features.
    pub feature_key: String,
    /// TopoJSON object to read. When unset the topology must hold exactly one object.
    pub topojson_object: Option<String>,
    /// Attributes to join. Empty means every non-key column.
    pub attributes: Vec<String>,
    pub num_classes: usize,
    pub ramp: String,
    /// Explicit class colors; overrides `ramp` and `num_classes` when set.
    pub colors: Option<Vec<String>>,
    pub missing_color: String,
    pub symbol_scale: f64,
    pub legend_precision: Option<usize>,
    pub chart: ChartConfig,
    pub separator: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_key: "GEOID".to_string(),
            feature_key: "GEOID".to_string(),
            topojson_object: None,
            attributes: Vec::new(),
            num_classes: 5,
            ramp: Ramp::PuRd.name().to_string(),
            colors: None,
            missing_color: MISSING_COLOR.to_string(),
            symbol_scale: 1.0,
            legend_precision: None,
            chart: ChartConfig::default(),
            separator: ',',
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .context("[config::from_json_str] Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config::from_path] Failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("[config::from_path] Invalid configuration in {}", path.display()))
    }

    /// Number of classes the classifier should aim for.
    pub fn class_count(&self) -> usize {
        self.colors.as_ref().map_or(self.num_classes, Vec::len)
    }

    /// Class colors for `k` classes: a prefix of the explicit list, or `k` samples of the ramp.
    /// A ramp sample that lands on the missing-data color is shifted by one step per channel.
    pub fn class_colors(&self, k: usize) -> Result<Vec<String>> {
        if let Some(colors) = &self.colors {
            ensure!(k <= colors.len(), "[config::class_colors] {} classes requested but only {} colors configured", k, colors.len());
            return Ok(match k {
                // Collapsed to a single class: use the middle color.
                1 => vec![colors[colors.len() / 2].clone()],
                _ => colors[..k].to_vec(),
            });
        }
        let ramp: Ramp = self.ramp.parse()?;
        let step = |v: u8| if v > 0 { v - 1 } else { 1 };
        Ok(ramp.colors(k).into_iter()
            .map(|c| match same_color(&c.to_string(), &self.missing_color) {
                true => Rgb::new(step(c.r), step(c.g), step(c.b)),
                false => c,
            })
            .map(|c| c.to_string())
            .collect())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.csv_key.is_empty(), "[config::validate] csv_key must not be empty");
        ensure!(!self.feature_key.is_empty(), "[config::validate] feature_key must not be empty");
        ensure!(self.class_count() >= 1, "[config::validate] at least one class is required");
        ensure!(self.symbol_scale.is_finite() && self.symbol_scale > 0.0, "[config::validate] symbol_scale must be positive");
        ensure!(self.separator.is_ascii(), "[config::validate] separator must be a single ASCII character");
        ensure!(
            self.chart.width >= 0.0 && self.chart.height >= 0.0 && self.chart.padding >= 0.0,
            "[config::validate] chart dimensions must be non-negative",
        );

        let colors = self.class_colors(self.class_count())?;
        if let Some(c) = colors.iter().find(|c| same_color(c, &self.missing_color)) {
            bail!("[config::validate] class color {} is the same as the missing-data color", c);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = Config::from_json_str(r#"{ "csv_key": "countyFIPS", "num_classes": 4 }"#).unwrap();
        assert_eq!(config.csv_key, "countyFIPS");
        assert_eq!(config.feature_key, "GEOID");
        assert_eq!(config.num_classes, 4);
        assert_eq!(config.missing_color, MISSING_COLOR);
        assert_eq!(config.chart, ChartConfig::default());
        assert_eq!(config.class_colors(4).unwrap().len(), 4);
    }

    #[test]
    fn explicit_colors_override_ramp() {
        let config = Config::from_json_str(r##"{ "colors": ["#f1eef6", "#d7b5d8", "#df65b0", "#dd1c77", "#980043"] }"##).unwrap();
        assert_eq!(config.class_count(), 5);
        assert_eq!(config.class_colors(3).unwrap(), vec!["#f1eef6", "#d7b5d8", "#df65b0"]);
        assert_eq!(config.class_colors(1).unwrap(), vec!["#df65b0"]);
        assert!(config.class_colors(6).is_err());
    }

    #[test]
    fn rejects_invalid_settings() {
        assert!(Config::from_json_str(r#"{ "ramp": "rainbow" }"#).is_err());
        assert!(Config::from_json_str(r#"{ "num_classes": 0 }"#).is_err());
        assert!(Config::from_json_str(r#"{ "symbol_scale": -1 }"#).is_err());
        assert!(Config::from_json_str(r##"{ "colors": ["#fff", "#ccc"] }"##).is_err());
        assert!(Config::from_json_str("not json").is_err());
    }

    #[test]
    fn ramp_samples_avoid_missing_color() {
        let config = Config { ramp: "Greys".to_string(), ..Config::default() };
        let colors = config.class_colors(20).unwrap();
        assert_eq!(colors.len(), 20);
        assert_eq!(colors[4], "#cbcbcb");
        assert!(colors.iter().all(|c| !same_color(c, MISSING_COLOR)));

        let config = Config { ramp: "Greys".to_string(), missing_color: "#000".to_string(), ..Config::default() };
        assert_eq!(config.class_colors(2).unwrap()[1], "#010101");
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "feature_key": "countyFIPS", "ramp": "Blues" }"#).unwrap();
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.feature_key, "countyFIPS");
        assert_eq!(config.ramp, "Blues");
    }
}
