//! Historical market data for the indicator engine.

mod csv_source;

pub use csv_source::CsvBarSource;
