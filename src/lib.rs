#![doc = "Choropleth public API: join attribute tables to regions, classify with natural breaks, color."]
pub mod chart;
pub mod classify;
pub mod color;
pub mod config;
pub mod io;
pub mod join;
pub mod legend;
pub mod session;
pub mod symbol;
mod types;

#[doc(inline)]
pub use types::{Property, Record, RegionKey, Row};

#[doc(inline)]
pub use classify::{ckmeans, classify, compute_breaks, Classification, ClassifyError};

#[doc(inline)]
pub use join::{join, join_summary, parse_float, JoinSummary};

#[doc(inline)]
pub use color::{Ramp, Rgb, MISSING_COLOR};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use session::{classify_attribute, Session};

#[doc(inline)]
pub use symbol::symbol_radius;

#[doc(inline)]
pub use legend::{Legend, LegendEntry};

#[doc(inline)]
pub use chart::{Bar, BarChart, ChartConfig};
