//! Joined records plus the expressed attribute and its classification.

use anyhow::{bail, ensure, Result};

use crate::{
    chart::BarChart,
    classify::{Classification, ClassifyError},
    config::Config,
    join::join,
    legend::Legend,
    symbol::symbol_radius,
    types::{Record, RegionKey, Row},
};

/// Classify `attribute` over `records` with the configured colors.
///
/// When there are fewer distinct values than classes the class count is reduced to the number
/// of distinct values; with no finite values at all a single-class classification is returned
/// (every record then renders with the missing color).
pub fn classify_attribute(records: &[Record], attribute: &str, config: &Config) -> Result<Classification> {
    let values: Vec<f64> = records.iter().map(|r| r.value(attribute)).collect();
    let requested = config.class_count();

    match Classification::compute(attribute, &values, config.class_colors(requested)?, config.missing_color.as_str()) {
        Err(ClassifyError::InsufficientData { distinct, requested }) => {
            let k = distinct.max(1);
            tracing::warn!(
                "[session] {} has {} distinct values; using {} classes instead of {}",
                attribute, distinct, k, requested,
            );
            let colors = config.class_colors(k)?;
            let classification = if distinct == 0 {
                Classification::new(attribute, Vec::new(), colors, config.missing_color.as_str())?
            } else {
                Classification::compute(attribute, &values, colors, config.missing_color.as_str())?
            };
            Ok(classification)
        }
        result => Ok(result?),
    }
}

/// The records of one map session and the attribute currently expressed on it.
///
/// The expressed attribute is only ever stored inside its `Classification`, so switching
/// attributes replaces the thresholds in the same step.
#[derive(Debug, Clone)]
pub struct Session {
    records: Vec<Record>,
    attributes: Vec<String>,
    config: Config,
    classification: Classification,
}

impl Session {
    /// Start a session expressing the first of `attributes`.
    pub fn new(records: Vec<Record>, attributes: Vec<String>, config: Config) -> Result<Self> {
        let Some(first) = attributes.first() else {
            bail!("[session::new] At least one attribute is required")
        };
        let classification = classify_attribute(&records, first, &config)?;
        tracing::info!("[session] {} records, expressing {}", records.len(), first);
        Ok(Self { records, attributes, config, classification })
    }

    /// Join `rows` into `records` and start a session.
    pub fn from_rows(mut records: Vec<Record>, rows: &[Row], attributes: Vec<String>, config: Config) -> Result<Self> {
        join(&mut records, rows, &attributes);
        Self::new(records, attributes, config)
    }

    pub fn records(&self) -> &[Record] { &self.records }

    pub fn attributes(&self) -> &[String] { &self.attributes }

    pub fn config(&self) -> &Config { &self.config }

    /// Name of the expressed attribute.
    pub fn expressed(&self) -> &str { self.classification.attribute() }

    pub fn classification(&self) -> &Classification { &self.classification }

    /// Express `attribute`, recomputing its classification from scratch.
    pub fn select(&mut self, attribute: &str) -> Result<&Classification> {
        ensure!(
            self.attributes.iter().any(|a| a == attribute),
            "[session::select] Unknown attribute {:?}. Expected one of: {}",
            attribute,
            self.attributes.join(", "),
        );
        self.classification = classify_attribute(&self.records, attribute, &self.config)?;
        tracing::info!("[session] expressing {} with thresholds {:?}", attribute, self.classification.thresholds());
        Ok(&self.classification)
    }

    /// Fill color for every record, in record order.
    pub fn colors(&self) -> Vec<(RegionKey, String)> {
        self.records.iter()
            .map(|r| (r.key.clone(), self.classification.color_for(r).to_string()))
            .collect()
    }

    /// Proportional symbol radius for every record (`None` for missing values).
    pub fn radii(&self) -> Vec<(RegionKey, Option<f64>)> {
        let attribute = self.expressed();
        self.records.iter()
            .map(|r| (r.key.clone(), symbol_radius(r.value(attribute), self.config.symbol_scale)))
            .collect()
    }

    pub fn legend(&self) -> Legend {
        Legend::new(&self.classification, self.config.legend_precision)
    }

    pub fn bars(&self) -> BarChart {
        BarChart::layout(&self.records, &self.classification, &self.config.chart)
    }
}
