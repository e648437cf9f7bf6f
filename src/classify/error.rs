use thiserror::Error;

/// Errors raised while building a classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// Fewer distinct finite values than requested classes.
    #[error("insufficient data: {distinct} distinct finite values for {requested} classes")]
    InsufficientData { distinct: usize, requested: usize },

    #[error("number of classes must be at least 1")]
    InvalidClassCount,

    #[error("expected {expected} colors for {thresholds} thresholds, got {actual}")]
    ColorCountMismatch { thresholds: usize, expected: usize, actual: usize },

    #[error("thresholds must be finite and strictly ascending")]
    UnsortedThresholds,

    #[error("class color {0:?} is the same as the missing-data color")]
    MissingColorCollision(String),
}
