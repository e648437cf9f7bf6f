//! Legend entries with human-readable class bounds.

use serde::Serialize;

use crate::classify::Classification;

/// Label of the trailing missing-data entry.
pub const NO_DATA_LABEL: &str = "No data";

/// One legend row. `lower`/`upper` are `None` for an open-ended class and for the no-data row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub attribute: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build the legend for `classification`, rounding labels to `precision` decimals
    /// (chosen from the data span when `None`). Ends with a "No data" entry.
    pub fn new(classification: &Classification, precision: Option<usize>) -> Self {
        let thresholds = classification.thresholds();
        let extent = classification.extent();
        let precision = precision.unwrap_or_else(|| auto_precision(extent, thresholds));

        let k = classification.num_classes();
        let mut entries = Vec::with_capacity(k + 1);
        for (i, color) in classification.colors().iter().enumerate() {
            let lower = if i == 0 { extent.map(|(lo, _)| lo) } else { Some(thresholds[i - 1]) };
            let upper = if i + 1 == k { extent.map(|(_, hi)| hi) } else { Some(thresholds[i]) };
            let label = match (lower, upper) {
                (Some(lo), Some(hi)) if lo == hi => format_number(lo, precision),
                (Some(lo), Some(hi)) => format!("{} - {}", format_number(lo, precision), format_number(hi, precision)),
                (None, Some(hi)) => format!("< {}", format_number(hi, precision)),
                (Some(lo), None) => format!(">= {}", format_number(lo, precision)),
                (None, None) => "All values".to_string(),
            };
            entries.push(LegendEntry { lower, upper, color: color.clone(), label });
        }
        entries.push(LegendEntry {
            lower: None,
            upper: None,
            color: classification.missing_color().to_string(),
            label: NO_DATA_LABEL.to_string(),
        });

        Self { attribute: classification.attribute().to_string(), entries }
    }
}

fn auto_precision(extent: Option<(f64, f64)>, thresholds: &[f64]) -> usize {
    let span = match (extent, thresholds.first(), thresholds.last()) {
        (Some((lo, hi)), _, _) => hi - lo,
        (None, Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    if span >= 10.0 { 0 } else if span >= 1.0 { 1 } else { 3 }
}

/// Round to `precision` decimals and group the integer digits by thousands.
pub fn format_number(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 { grouped.push(',') }
        grouped.push(c);
    }

    // "-0" after rounding reads as zero.
    let sign = if grouped.chars().all(|c| c == '0' || c == ',') && frac_part.is_none_or(|f| f.chars().all(|c| c == '0')) { "" } else { sign };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
