//! Data provider trait and structured error types.
//!
//! The provider is an external collaborator: the engine only needs
//! "give me N candles of this symbol at this timeframe, ascending".
//! Implementations (CSV files, synthetic walks) live in `fxlab-runner`.

use crate::domain::Candle;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// No symbol produced a usable clock — the run cannot start.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("symbol unavailable: {symbol}")]
    SymbolUnavailable { symbol: String },

    #[error("malformed candle data: {0}")]
    Malformed(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Source of historical candles.
///
/// Rows must be sorted ascending by timestamp. An `Err` or an empty result
/// excludes that symbol from the run; it never aborts other symbols.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch up to `periods` candles for `symbol` at `timeframe`.
    fn get_historical_data(
        &self,
        symbol: &str,
        timeframe: &str,
        periods: usize,
    ) -> Result<Vec<Candle>, DataError>;
}
