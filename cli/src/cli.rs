use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Choropleth classification CLI
#[derive(Parser, Debug)]
#[command(name = "choropleth", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print natural-breaks thresholds for one column of a table
    Breaks(BreaksArgs),

    /// Join a table to region boundaries and write a colored GeoJSON
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct BreaksArgs {
    /// Input attribute table (CSV)
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Column to classify
    pub attribute: String,

    /// Number of classes
    #[arg(short = 'k', long, default_value_t = 5)]
    pub classes: usize,

    /// Region key column
    #[arg(long, default_value = "GEOID")]
    pub key: String,

    /// Field separator
    #[arg(long, default_value_t = ',')]
    pub separator: char,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input attribute table (CSV)
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Region boundaries (GeoJSON FeatureCollection or TopoJSON topology)
    #[arg(value_hint = ValueHint::FilePath)]
    pub regions: PathBuf,

    /// Output GeoJSON file with `fill` and `class` properties
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Attribute to express (defaults to the first joined attribute)
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// Also write the legend as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub legend: Option<PathBuf>,

    /// Also write key, value, class and fill per region as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub table: Option<PathBuf>,

    /// Also write the bar chart layout as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub chart: Option<PathBuf>,

    /// Overwrite output files that already exist
    #[arg(long)]
    pub force: bool,
}
