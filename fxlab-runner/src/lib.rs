//! FxLab Runner — everything that happens around a run.
//!
//! The engine in `fxlab-core` produces a frozen trade list and equity
//! curve; this crate turns them into statistics and report artifacts,
//! and supplies data sources (CSV files, seeded synthetic walks) plus
//! TOML run configuration.

pub mod config;
pub mod loader;
pub mod metrics;
pub mod reporting;
pub mod synthetic;

pub use config::{DataSourceConfig, RunConfig, StrategyConfig};
pub use loader::CsvDataProvider;
pub use metrics::BacktestMetrics;
pub use reporting::{ArtifactManager, ArtifactPaths};
pub use synthetic::SyntheticProvider;
