use std::path::Path;

use anyhow::{ensure, Result};
use choropleth::{
    io::{read_csv, read_regions, to_geojson, write_classified_csv, write_json},
    join_summary, Config, Session,
};

fn check_writable(path: &Path, force: bool) -> Result<()> {
    ensure!(force || !path.exists(), "[render] {} already exists (use --force to overwrite)", path.display());
    Ok(())
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    for path in [Some(&args.output), args.legend.as_ref(), args.table.as_ref(), args.chart.as_ref()].into_iter().flatten() {
        check_writable(path, args.force)?;
    }

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    tracing::info!("[render] reading table {}", args.data.display());
    let table = read_csv(&args.data, &config.csv_key, config.separator as u8)?;

    tracing::info!("[render] reading regions {}", args.regions.display());
    let mut records = read_regions(&args.regions, &config)?;

    let attributes = if config.attributes.is_empty() { table.columns.clone() } else { config.attributes.clone() };
    let summary = join_summary(&mut records, &table.rows, &attributes);
    tracing::info!(
        "[render] joined {} of {} rows onto {} regions ({} unmatched, {} duplicates)",
        summary.matched, table.rows.len(), records.len(), summary.unmatched_rows, summary.duplicate_rows,
    );

    let mut session = Session::new(records, attributes, config)?;
    if let Some(attribute) = &args.attribute {
        session.select(attribute)?;
    }
    let feature_key = session.config().feature_key.clone();

    tracing::info!("[render] writing {}", args.output.display());
    write_json(&to_geojson(session.records(), session.classification(), &feature_key), &args.output)?;

    if let Some(path) = &args.legend {
        tracing::info!("[render] writing legend {}", path.display());
        write_json(&session.legend(), path)?;
    }
    if let Some(path) = &args.table {
        tracing::info!("[render] writing table {}", path.display());
        write_classified_csv(session.records(), session.classification(), path)?;
    }
    if let Some(path) = &args.chart {
        tracing::info!("[render] writing chart {}", path.display());
        write_json(&session.bars(), path)?;
    }

    Ok(())
}
