use anyhow::{ensure, Result};
use choropleth::{ckmeans, io::read_csv, legend::format_number, parse_float};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::BreaksArgs) -> Result<()> {
    ensure!(args.separator.is_ascii(), "[breaks] separator must be a single ASCII character");

    tracing::info!("[breaks] reading {}", args.data.display());
    let table = read_csv(&args.data, &args.key, args.separator as u8)?;
    ensure!(
        table.columns.iter().any(|c| c == &args.attribute),
        "[breaks] column {:?} not found; available: {}", args.attribute, table.columns.join(", "),
    );

    let values: Vec<f64> = table.rows.iter()
        .map(|row| row.raw(&args.attribute).map_or(f64::NAN, parse_float))
        .collect();
    let missing = values.iter().filter(|v| !v.is_finite()).count();

    let clusters = ckmeans(&values, args.classes)?;
    println!("{} ({} values, {} missing)", args.attribute, values.len() - missing, missing);
    for (i, cluster) in clusters.iter().enumerate() {
        let (lo, hi) = (cluster[0], cluster[cluster.len() - 1]);
        println!("  class {}: {} - {} ({} values)", i + 1, format_number(lo, 2), format_number(hi, 2), cluster.len());
    }
    let thresholds: Vec<f64> = clusters.iter().skip(1).map(|c| c[0]).collect();
    println!("thresholds: {:?}", thresholds);

    Ok(())
}
