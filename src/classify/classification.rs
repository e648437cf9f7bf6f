use serde::Serialize;

use crate::{color::{same_color, MISSING_COLOR}, types::Record};

use super::{compute_breaks, ClassifyError};

/// Color for `value` given ascending `thresholds` and `colors` (one more color than thresholds).
///
/// Non-finite values get `MISSING_COLOR`. Otherwise the class index is the number of thresholds
/// less than or equal to `value`. The length relation between `thresholds` and `colors` is
/// checked once by `Classification::new`; here an out-of-range index falls back to the last color.
pub fn classify<'a, S: AsRef<str>>(value: f64, thresholds: &[f64], colors: &'a [S]) -> &'a str {
    if !value.is_finite() { return MISSING_COLOR }
    let i = thresholds.partition_point(|t| *t <= value);
    colors.get(i).or(colors.last()).map_or(MISSING_COLOR, |c| c.as_ref())
}

/// Thresholds and colors for one expressed attribute.
///
/// The attribute name travels with its thresholds so a classification computed for one
/// attribute is never applied to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    attribute: String,
    thresholds: Vec<f64>,
    colors: Vec<String>,
    missing_color: String,
    /// Finite data extent the thresholds were computed from, if known.
    extent: Option<(f64, f64)>,
}

impl Classification {
    /// Validate and assemble a classification from precomputed thresholds.
    pub fn new(
        attribute: impl Into<String>,
        thresholds: Vec<f64>,
        colors: Vec<String>,
        missing_color: impl Into<String>,
    ) -> Result<Self, ClassifyError> {
        let missing_color = missing_color.into();

        if colors.len() != thresholds.len() + 1 {
            return Err(ClassifyError::ColorCountMismatch {
                thresholds: thresholds.len(),
                expected: thresholds.len() + 1,
                actual: colors.len(),
            });
        }
        if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClassifyError::UnsortedThresholds);
        }
        if let Some(color) = colors.iter().find(|c| same_color(c, &missing_color)) {
            return Err(ClassifyError::MissingColorCollision(color.clone()));
        }

        Ok(Self { attribute: attribute.into(), thresholds, colors, missing_color, extent: None })
    }

    /// Compute natural breaks for `values` with one class per color.
    pub fn compute(
        attribute: impl Into<String>,
        values: &[f64],
        colors: Vec<String>,
        missing_color: impl Into<String>,
    ) -> Result<Self, ClassifyError> {
        let thresholds = compute_breaks(values, colors.len())?;
        Ok(Self::new(attribute, thresholds, colors, missing_color)?.with_extent(values))
    }

    /// Record the finite min/max of `values` (used for legend bounds).
    pub fn with_extent(mut self, values: &[f64]) -> Self {
        self.extent = values.iter().copied().filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        self
    }

    pub fn attribute(&self) -> &str { &self.attribute }

    pub fn thresholds(&self) -> &[f64] { &self.thresholds }

    pub fn colors(&self) -> &[String] { &self.colors }

    pub fn missing_color(&self) -> &str { &self.missing_color }

    pub fn extent(&self) -> Option<(f64, f64)> { self.extent }

    pub fn num_classes(&self) -> usize { self.colors.len() }

    /// Class index for `value`, `None` for missing data.
    pub fn class_index(&self, value: f64) -> Option<usize> {
        value.is_finite().then(|| self.thresholds.partition_point(|t| *t <= value))
    }

    /// Color for `value` under this classification.
    pub fn color(&self, value: f64) -> &str {
        match self.class_index(value) {
            Some(i) => &self.colors[i],
            None => &self.missing_color,
        }
    }

    /// Color for a record, reading this classification's attribute.
    pub fn color_for(&self, record: &Record) -> &str {
        self.color(record.value(&self.attribute))
    }
}
