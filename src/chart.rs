//! Layout data for the bar chart coordinated with the map.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{classify::Classification, types::{Record, RegionKey}};

/// Headroom above the largest bar.
const DOMAIN_HEADROOM: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Gap between neighboring bars.
    pub padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { width: 480.0, height: 460.0, padding: 1.0 }
    }
}

/// One bar, in chart units with the baseline at height 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub key: RegionKey,
    pub value: Option<f64>,
    pub rank: usize,
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub attribute: String,
    /// Upper end of the value axis (largest value plus headroom).
    pub domain_max: f64,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// One bar per record, largest value first and missing values last.
    /// Heights follow a linear scale from `[0, max * 1.1]` onto `[0, config.height]`.
    pub fn layout(records: &[Record], classification: &Classification, config: &ChartConfig) -> Self {
        let attribute = classification.attribute();

        let mut entries: Vec<(&Record, Option<f64>)> = records.iter()
            .map(|r| {
                let v = r.value(attribute);
                (r, v.is_finite().then_some(v))
            })
            .collect();
        entries.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(x), Some(y)) => y.total_cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let max = entries.iter().filter_map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let domain_max = if max > 0.0 { max * DOMAIN_HEADROOM } else { 0.0 };

        let slot = if entries.is_empty() { 0.0 } else { config.width / entries.len() as f64 };
        let width = (slot - config.padding).max(0.0);

        let bars = entries.into_iter().enumerate().map(|(rank, (record, value))| {
            let height = match value {
                Some(v) if domain_max > 0.0 => (v / domain_max * config.height).clamp(0.0, config.height),
                _ => 0.0,
            };
            Bar {
                key: record.key.clone(),
                value,
                rank,
                x: rank as f64 * slot,
                width,
                height,
                color: classification.color(value.unwrap_or(f64::NAN)).to_string(),
            }
        }).collect();

        Self { attribute: attribute.to_string(), domain_max, bars }
    }
}

#[cfg(test)]
mod tests {
    use crate::color::MISSING_COLOR;

    use super::*;

    fn record(key: &str, pop: Option<f64>) -> Record {
        let mut r = Record::new(key);
        if let Some(v) = pop { r.set("pop", v) }
        r
    }

    #[test]
    fn bars_sorted_and_scaled() {
        let records = vec![record("A", Some(10.0)), record("B", None), record("C", Some(100.0)), record("D", Some(50.0))];
        let classification = Classification::new("pop", vec![50.0], vec!["lo".into(), "hi".into()], MISSING_COLOR).unwrap();
        let config = ChartConfig { width: 400.0, height: 110.0, padding: 2.0 };

        let chart = BarChart::layout(&records, &classification, &config);

        let keys: Vec<&str> = chart.bars.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "D", "A", "B"]);
        assert!((chart.domain_max - 110.0).abs() < 1e-9);
        assert!((chart.bars[0].height - 100.0).abs() < 1e-9);
        assert!((chart.bars[2].height - 10.0).abs() < 1e-9);
        assert_eq!(chart.bars[3].height, 0.0);
        assert_eq!(chart.bars[3].color, MISSING_COLOR);
        assert_eq!(chart.bars[0].color, "hi");
        assert_eq!(chart.bars[2].color, "lo");
        assert_eq!(chart.bars[1].x, 100.0);
        assert_eq!(chart.bars[1].width, 98.0);
        assert_eq!(chart.bars[3].rank, 3);
    }

    #[test]
    fn empty_and_all_missing() {
        let classification = Classification::new("pop", vec![], vec!["c".into()], MISSING_COLOR).unwrap();
        let chart = BarChart::layout(&[], &classification, &ChartConfig::default());
        assert!(chart.bars.is_empty());

        let chart = BarChart::layout(&[record("A", None)], &classification, &ChartConfig::default());
        assert_eq!(chart.domain_max, 0.0);
        assert_eq!(chart.bars[0].height, 0.0);
    }
}
