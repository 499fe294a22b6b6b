//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a run: engine
//! parameters, strategies, and the data source. Its content hash is the
//! run id, so identical configs land in the same artifact directory.

use crate::loader::CsvDataProvider;
use crate::synthetic::SyntheticProvider;
use anyhow::{bail, Context, Result};
use fxlab_core::config::BacktestConfig;
use fxlab_core::data::DataProvider;
use fxlab_core::strategy::{MaCrossover, Strategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Complete, serializable description of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Engine parameters.
    #[serde(default)]
    pub backtest: BacktestConfig,

    /// Strategies, consulted in order each bar.
    pub strategies: Vec<StrategyConfig>,

    /// Where candles come from.
    pub data: DataSourceConfig,
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if config.strategies.is_empty() {
            bail!("{}: at least one strategy is required", path.display());
        }
        Ok(config)
    }

    /// Deterministic hash id for this configuration. Two identical
    /// configs produce the same id and overwrite each other's artifacts.
    pub fn run_id(&self) -> Result<RunId> {
        let json = serde_json::to_string(self).context("failed to serialize run config")?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    pub fn build_strategies(&self) -> Result<Vec<Box<dyn Strategy>>> {
        self.strategies.iter().map(|s| s.build()).collect()
    }

    pub fn build_provider(&self) -> Box<dyn DataProvider> {
        match &self.data {
            DataSourceConfig::Synthetic { seed } => Box::new(SyntheticProvider::new(*seed)),
            DataSourceConfig::Csv { dir } => Box::new(CsvDataProvider::new(dir)),
        }
    }
}

/// Strategy configuration (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    /// Moving average crossover: fast MA crosses slow MA.
    MaCrossover {
        fast_period: usize,
        slow_period: usize,
        #[serde(default)]
        stop_pips: Option<f64>,
        #[serde(default)]
        target_pips: Option<f64>,
    },
}

impl StrategyConfig {
    pub fn build(&self) -> Result<Box<dyn Strategy>> {
        match *self {
            StrategyConfig::MaCrossover {
                fast_period,
                slow_period,
                stop_pips,
                target_pips,
            } => {
                if fast_period == 0 || slow_period <= fast_period {
                    bail!(
                        "ma_cross: need 0 < fast_period < slow_period, \
                         got {fast_period}/{slow_period}"
                    );
                }
                let mut strategy = MaCrossover::new(fast_period, slow_period);
                if let (Some(stop), Some(target)) = (stop_pips, target_pips) {
                    strategy = strategy.with_stops(stop, target);
                }
                Ok(Box::new(strategy))
            }
        }
    }
}

/// Data source configuration (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceConfig {
    /// Seeded random-walk candles; fully deterministic.
    Synthetic { seed: u64 },

    /// One CSV file per symbol under a directory.
    Csv { dir: PathBuf },
}
