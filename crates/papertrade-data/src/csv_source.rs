//! CSV bar source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use papertrade_core::error::DataError;
use papertrade_core::types::Bar;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

/// Daily bars from a `date,open,high,low,close,volume` CSV file.
///
/// Rows must already be in strictly increasing date order; the loader
/// reports the first row that breaks it instead of sorting.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    /// Create a new CSV bar source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all bars from the file.
    pub fn load(&self) -> Result<Vec<Bar>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::Parse(format!("{}: {e}", self.path.display())))?;
        let bars = Self::from_reader(file)?;

        tracing::debug!(
            path = %self.path.display(),
            bars = bars.len(),
            first = ?bars.first().map(|b| b.date),
            last = ?bars.last().map(|b| b.date),
            "Loaded bars"
        );
        Ok(bars)
    }

    /// Parse bars from any CSV reader with a header row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut bars: Vec<Bar> = Vec::new();

        for (index, result) in reader.deserialize().enumerate() {
            let row = index + 1;
            let record: CsvRecord =
                result.map_err(|e| DataError::Parse(format!("row {row}: {e}")))?;

            let date = parse_date(&record.date)?;
            if record.volume < 0.0 {
                return Err(DataError::Parse(format!(
                    "row {row}: negative volume {}",
                    record.volume
                )));
            }

            if let Some(previous) = bars.last().map(|b| b.date) {
                if date <= previous {
                    return Err(DataError::Unordered {
                        row,
                        date,
                        previous,
                    });
                }
            }

            bars.push(Bar::new(
                date,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        Ok(bars)
    }
}

/// Parse various date formats down to a calendar day.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    // Unix timestamp; assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {date_str}")))
}
