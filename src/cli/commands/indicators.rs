//! Indicators command implementation.

use anyhow::{Context, Result};
use papertrade_config::AppConfig;
use papertrade_data::CsvBarSource;
use papertrade_indicators::{DerivedSeries, SeriesRow};
use tracing::info;

use crate::cli::{IndicatorArgs, OutputFormat};

pub fn run(args: IndicatorArgs, config: &AppConfig) -> Result<()> {
    let source = CsvBarSource::new(&args.data)
        .with_context(|| format!("Cannot read bars from {}", args.data.display()))?;
    let bars = source.load().context("Failed to load bars")?;
    info!("Loaded {} bars from {}", bars.len(), args.data.display());

    let series = DerivedSeries::compute(&bars, &config.indicators);
    let rows = series.tail(args.last.unwrap_or(series.len()));

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => print!("{}", render_table(&series, &rows)),
    }

    Ok(())
}

fn render_table(series: &DerivedSeries, rows: &[SeriesRow]) -> String {
    let s = &series.settings;
    let mut out = format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>9} {:>9} {:>9} {:>10}\n",
        "DATE",
        "CLOSE",
        format!("SMA{}", s.sma_fast),
        format!("SMA{}", s.sma_slow),
        format!("EMA{}", s.ema),
        format!("RSI{}", s.rsi),
        "MACD",
        "SIGNAL",
        "HIST",
        "VWAP",
    );
    for row in rows {
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10} {:>10} {:>10} {:>8} {:>9} {:>9} {:>9} {:>10}\n",
            row.date,
            row.close,
            cell(row.sma_fast, 2),
            cell(row.sma_slow, 2),
            cell(row.ema, 2),
            cell(row.rsi, 1),
            cell(row.macd, 3),
            cell(row.signal, 3),
            cell(row.histogram, 3),
            cell(row.vwap, 2),
        ));
    }
    out
}

fn cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}
