//! CSV candle loading.
//!
//! One file per symbol (`<dir>/<SYMBOL>.csv`) with a header row of
//! `timestamp,open,high,low,close,volume` and optional `bid,ask`
//! columns. The timeframe is whatever the file contains; the loader
//! trusts the caller to point it at files of the right resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use fxlab_core::data::{DataError, DataProvider};
use fxlab_core::domain::Candle;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw CSV row; the timestamp stays a string until parsed leniently.
#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
}

/// Accepts RFC 3339, `%Y-%m-%d %H:%M:%S`, or a bare date.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default()));
    }
    Err(DataError::Malformed(format!(
        "unparseable timestamp '{raw}'"
    )))
}

/// File-backed data source: one CSV per symbol under a directory.
#[derive(Debug, Clone)]
pub struct CsvDataProvider {
    dir: PathBuf,
}

impl CsvDataProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvDataProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn get_historical_data(
        &self,
        symbol: &str,
        _timeframe: &str,
        periods: usize,
    ) -> Result<Vec<Candle>, DataError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(DataError::SymbolUnavailable {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| DataError::Malformed(format!("{}: {e}", path.display())))?;

        let mut candles = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| DataError::Malformed(format!("{}: {e}", path.display())))?;
            let candle = Candle {
                timestamp: parse_timestamp(&row.timestamp)?,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                bid: row.bid,
                ask: row.ask,
            };
            if !candle.is_sane() {
                return Err(DataError::Malformed(format!(
                    "{}: inconsistent OHLC at {}",
                    path.display(),
                    candle.timestamp
                )));
            }
            candles.push(candle);
        }

        if candles.is_empty() {
            return Err(DataError::InsufficientData(format!(
                "{}: no rows",
                path.display()
            )));
        }

        candles.sort_by_key(|c| c.timestamp);
        if candles.len() > periods {
            candles.drain(..candles.len() - periods);
        }
        debug!("{symbol}: {} candles from {}", candles.len(), path.display());
        Ok(candles)
    }
}
