//! Immutable run parameters, validated once at construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors fail fast — the run never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("initial balance must be positive, got {0}")]
    NonPositiveBalance(f64),

    #[error("leverage must be >= 1, got {0}")]
    InvalidLeverage(f64),

    #[error("{name} must be non-negative, got {value}")]
    NegativeRate { name: &'static str, value: f64 },

    #[error("max open positions must be >= 1")]
    ZeroMaxOpenPositions,

    #[error("history periods must be >= 2, got {0}")]
    TooFewPeriods(usize),

    #[error("date range is inverted: start {start} is after end {end}")]
    InvertedDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("no symbols configured")]
    NoSymbols,
}

/// Parameters for a single backtest run.
///
/// Deserializable from TOML; every field has a sensible default so configs
/// only need to override what they care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    pub leverage: f64,
    /// Commission as a fraction of notional, charged per leg.
    pub commission_rate: f64,
    /// Adverse fill movement as a fraction of price, applied per fill.
    pub slippage_rate: f64,
    /// Spread in pips applied when candles carry no bid/ask quotes.
    pub spread_pips: f64,
    /// Fraction of balance risked per trade by the fallback sizer.
    pub risk_per_trade: f64,
    pub max_open_positions: usize,
    /// Candle count requested from the data provider per symbol.
    pub periods: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub timeframe: String,
    pub symbols: Vec<String>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            leverage: 1.0,
            commission_rate: 0.0,
            slippage_rate: 0.0,
            spread_pips: 1.0,
            risk_per_trade: 0.02,
            max_open_positions: 5,
            periods: 500,
            start: None,
            end: None,
            timeframe: "H1".into(),
            symbols: vec!["EURUSD".into(), "GBPUSD".into()],
        }
    }
}

impl BacktestConfig {
    /// Validate all parameters. Called once before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance <= 0.0 {
            return Err(ConfigError::NonPositiveBalance(self.initial_balance));
        }
        if self.leverage < 1.0 {
            return Err(ConfigError::InvalidLeverage(self.leverage));
        }
        for (name, value) in [
            ("commission_rate", self.commission_rate),
            ("slippage_rate", self.slippage_rate),
            ("spread_pips", self.spread_pips),
            ("risk_per_trade", self.risk_per_trade),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeRate { name, value });
            }
        }
        if self.max_open_positions == 0 {
            return Err(ConfigError::ZeroMaxOpenPositions);
        }
        if self.periods < 2 {
            return Err(ConfigError::TooFewPeriods(self.periods));
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ConfigError::InvertedDateRange { start, end });
            }
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        Ok(())
    }

    /// Half-spread in price terms for a symbol, used to derive bid/ask
    /// from close-only candles.
    pub fn half_spread(&self, symbol: &str) -> f64 {
        crate::domain::pip_size(symbol) * self.spread_pips / 2.0
    }
}
