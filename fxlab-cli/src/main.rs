//! FxLab CLI — run backtests from the command line.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file
//! - `demo` — quick synthetic-data run with a stock MA-cross strategy

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fxlab_core::Backtester;
use fxlab_runner::config::{DataSourceConfig, RunConfig, StrategyConfig};
use fxlab_runner::{ArtifactManager, BacktestMetrics};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fxlab", about = "FxLab — multi-symbol forex backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Run a synthetic-data demo with a moving-average crossover.
    Demo {
        /// Synthetic data seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Symbols to simulate.
        #[arg(long, default_values_t = vec!["EURUSD".to_string(), "GBPUSD".to_string()])]
        symbols: Vec<String>,

        /// Candles per symbol.
        #[arg(long, default_value_t = 500)]
        periods: usize,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => {
            let run_config = RunConfig::from_toml_file(&config)?;
            execute(run_config, &output_dir)
        }
        Commands::Demo {
            seed,
            symbols,
            periods,
            output_dir,
        } => {
            let mut run_config = RunConfig {
                backtest: Default::default(),
                strategies: vec![StrategyConfig::MaCrossover {
                    fast_period: 10,
                    slow_period: 30,
                    stop_pips: None,
                    target_pips: None,
                }],
                data: DataSourceConfig::Synthetic { seed },
            };
            run_config.backtest.symbols = symbols;
            run_config.backtest.periods = periods;
            execute(run_config, &output_dir)
        }
    }
}

fn execute(run_config: RunConfig, output_dir: &Path) -> Result<()> {
    let run_id = run_config.run_id()?;
    info!("run id {run_id}");

    let provider = run_config.build_provider();
    let mut engine =
        Backtester::new(run_config.backtest.clone()).context("invalid backtest config")?;
    for strategy in run_config.build_strategies()? {
        engine = engine.add_strategy(strategy);
    }

    let result = engine.run(provider.as_ref()).context("backtest failed")?;
    let metrics = BacktestMetrics::from_result(&result);

    print_summary(&result, &metrics);

    let artifacts = ArtifactManager::new(output_dir)?;
    let paths = artifacts.save_run(&run_id, &result, &metrics)?;
    println!();
    println!(
        "Artifacts saved to: {}",
        paths
            .summary_txt
            .parent()
            .unwrap_or(paths.summary_txt.as_path())
            .display()
    );

    Ok(())
}

fn print_summary(result: &fxlab_core::RunResult, metrics: &BacktestMetrics) {
    println!();
    println!("=== Backtest Result ===");
    println!("Symbols:        {}", result.symbols.join(", "));
    if !result.skipped_symbols.is_empty() {
        println!("Skipped:        {}", result.skipped_symbols.join(", "));
    }
    println!("Bars:           {}", result.bar_count);
    println!("Trades:         {}", metrics.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Final Balance:  {:.2}", metrics.final_balance);
    println!("Total Return:   {:+.2}%", metrics.total_return_pct);
    println!("Annualized:     {:+.2}%", metrics.annualized_return_pct);
    println!("Sharpe:         {:.3}", metrics.sharpe_ratio);
    println!("Sortino:        {:.3}", metrics.sortino_ratio);
    println!("Calmar:         {:.3}", metrics.calmar_ratio);
    println!("Max Drawdown:   {:.2}%", metrics.max_drawdown_pct);
    println!("Win Rate:       {:.1}%", metrics.win_rate);
    println!("Profit Factor:  {:.2}", metrics.profit_factor);
    if result.risk_halted {
        println!();
        println!("WARNING: risk breaker fired during this run");
    }
    if result.soft_failures > 0 {
        println!("WARNING: {} strategy faults were swallowed", result.soft_failures);
    }
}
