//! Natural-breaks classification and color lookup.

mod ckmeans;
mod classification;
mod error;

pub use ckmeans::{ckmeans, compute_breaks};
pub use classification::{classify, Classification};
pub use error::ClassifyError;
