//! Proportional symbol sizing.

use std::f64::consts::PI;

/// Radius of a proportional circle whose area scales with `value`:
/// `sqrt((value * scale_factor) / PI) * 2`.
///
/// Returns `None` for missing (non-finite) or negative values, which have no area.
pub fn symbol_radius(value: f64, scale_factor: f64) -> Option<f64> {
    let area = value * scale_factor;
    if !area.is_finite() || area < 0.0 { return None }
    Some((area / PI).sqrt() * 2.0)
}
