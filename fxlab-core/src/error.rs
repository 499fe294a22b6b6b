//! Run-level error channel.
//!
//! Only two things terminate a run before completion: an invalid
//! configuration and zero usable market data. Everything below that level
//! (per-symbol fetch failures, per-bar strategy faults, rejected entries)
//! degrades gracefully inside the bar loop.

use crate::config::ConfigError;
use crate::data::DataError;
use thiserror::Error;

/// Hard failures that stop a backtest run.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}
