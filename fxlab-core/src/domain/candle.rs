//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation for a symbol at a timestamp.
///
/// Immutable once ingested. Bid/ask are optional; when a feed only carries
/// mid/close prices the engine derives both sides from `close` using the
/// configured spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
}

impl Candle {
    /// Bid side of this bar. Falls back to `close - half_spread` when the
    /// feed carries no quote data.
    pub fn bid_price(&self, half_spread: f64) -> f64 {
        self.bid.unwrap_or(self.close - half_spread)
    }

    /// Ask side of this bar. Falls back to `close + half_spread`.
    pub fn ask_price(&self, half_spread: f64) -> f64 {
        self.ask.unwrap_or(self.close + half_spread)
    }

    /// Basic OHLCV sanity check: high >= low, OHLC within [low, high],
    /// positive prices, non-negative volume.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// Smallest standard price increment for a currency pair.
///
/// 0.01 for JPY crosses, 0.0001 for everything else.
pub fn pip_size(symbol: &str) -> f64 {
    if symbol.contains("JPY") {
        0.01
    } else {
        0.0001
    }
}
