//! FxLab Core — multi-symbol forex backtesting engine.
//!
//! This crate contains the heart of the simulator:
//! - Domain types (candles, signals, positions, account state)
//! - Multi-symbol timestamp alignment into one simulation clock
//! - Bar-by-bar loop: exit checks, signal dispatch, gated entries
//! - Position ledger with spread/slippage/commission/leverage cost model
//! - Equity tracking with drawdown breakers
//!
//! Post-run statistics and report writers live in `fxlab-runner`.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod strategy;

pub use config::BacktestConfig;
pub use engine::run::{Backtester, RunResult, RunStatus};
pub use error::BacktestError;
