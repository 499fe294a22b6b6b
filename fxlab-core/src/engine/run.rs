//! The backtest run: one engine instance drives one run, bar by bar.
//!
//! Control flow per clock tick: cooperative cancellation check, then per
//! symbol (in configured order) gated signal entry followed by exit
//! evaluation, then the equity mark and risk breakers. The loop is
//! strictly sequential; parallel sweeps instantiate independent engines.

use crate::config::{BacktestConfig, ConfigError};
use crate::data::{AlignedMarket, DataProvider};
use crate::domain::{AccountState, Candle, EquityPoint, ExitReason, Position};
use crate::engine::dispatcher::SignalDispatcher;
use crate::engine::equity::EquityTracker;
use crate::engine::ledger::PositionLedger;
use crate::error::BacktestError;
use crate::strategy::{RiskManager, Strategy};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The cancellation flag was raised; the result covers the bars
    /// processed so far, with open positions force-closed.
    Cancelled,
}

/// Frozen output of one run: the immutable trade history plus the
/// equity curve, ready for the metrics engine and report writers.
#[derive(Debug)]
pub struct RunResult {
    pub trades: Vec<Position>,
    pub equity_curve: Vec<EquityPoint>,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub status: RunStatus,
    /// Whether an emergency breaker (drawdown or balance floor) fired at
    /// any point during the run.
    pub risk_halted: bool,
    pub bar_count: usize,
    /// Symbols that made it into the simulation clock.
    pub symbols: Vec<String>,
    /// Symbols excluded for lack of data.
    pub skipped_symbols: Vec<String>,
    /// Strategy faults swallowed by the dispatcher.
    pub soft_failures: usize,
}

/// One backtest run over multi-symbol history.
///
/// Owns its config, strategies, and ledger — no process-wide state.
/// Not designed for reuse: `run` consumes the engine.
pub struct Backtester {
    config: BacktestConfig,
    strategies: Vec<Box<dyn Strategy>>,
    risk_manager: Option<Box<dyn RiskManager>>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Backtester {
    /// Validates the configuration; an invalid config never starts.
    pub fn new(config: BacktestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            strategies: Vec::new(),
            risk_manager: None,
            cancel: None,
        })
    }

    pub fn add_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_risk_manager(mut self, risk_manager: Box<dyn RiskManager>) -> Self {
        self.risk_manager = Some(risk_manager);
        self
    }

    /// Install a cooperative cancellation flag, checked at the top of
    /// every bar.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Fetch history for every configured symbol. A per-symbol failure
    /// excludes that symbol; it never aborts the others.
    fn load_data(
        &self,
        provider: &dyn DataProvider,
    ) -> (HashMap<String, Vec<Candle>>, Vec<String>) {
        let mut series = HashMap::new();
        let mut skipped = Vec::new();
        for symbol in &self.config.symbols {
            match provider.get_historical_data(symbol, &self.config.timeframe, self.config.periods)
            {
                Ok(candles) => {
                    let candles = self.clip_to_range(candles);
                    if candles.is_empty() {
                        warn!("{symbol}: no candles in configured range, excluded from run");
                        skipped.push(symbol.clone());
                    } else {
                        debug!("{symbol}: loaded {} candles", candles.len());
                        series.insert(symbol.clone(), candles);
                    }
                }
                Err(e) => {
                    warn!("{symbol}: data fetch failed ({e}), excluded from run");
                    skipped.push(symbol.clone());
                }
            }
        }
        (series, skipped)
    }

    fn clip_to_range(&self, candles: Vec<Candle>) -> Vec<Candle> {
        candles
            .into_iter()
            .filter(|c| {
                self.config.start.map_or(true, |s| c.timestamp >= s)
                    && self.config.end.map_or(true, |e| c.timestamp <= e)
            })
            .collect()
    }

    /// Run the simulation to completion (or cancellation).
    pub fn run(mut self, provider: &dyn DataProvider) -> Result<RunResult, BacktestError> {
        let (series, skipped_symbols) = self.load_data(provider);
        let market = AlignedMarket::build(series, &self.config.symbols)?;
        info!(
            "starting run: {} symbols, {} bars",
            market.symbols().len(),
            market.clock().len()
        );

        let mut account = AccountState::new(self.config.initial_balance);
        let mut ledger = PositionLedger::new(self.config.clone());
        let mut tracker = EquityTracker::new(self.config.initial_balance);
        let mut dispatcher = SignalDispatcher::new();
        let mut last_candles: HashMap<String, Candle> = HashMap::new();

        let mut status = RunStatus::Completed;
        let mut risk_halted = false;
        let mut bar_count = 0usize;
        let mut last_tick = market.clock()[0];

        for (i, &now) in market.clock().iter().enumerate() {
            if self
                .cancel
                .as_ref()
                .is_some_and(|c| c.load(Ordering::Relaxed))
            {
                info!("cancellation requested at bar {i}, stopping");
                status = RunStatus::Cancelled;
                break;
            }
            last_tick = now;
            bar_count += 1;

            for symbol in market.symbols() {
                // A symbol not covering this tick is skipped for the bar.
                let Some(candle) = market.candle(symbol, now) else {
                    continue;
                };
                last_candles.insert(symbol.clone(), candle.clone());

                // Entry before exit evaluation: a position closed this bar
                // cannot re-open on the same bar, and a fresh entry is
                // exit-checked against its own entry candle.
                if !ledger.has_open(symbol) {
                    for strategy in &mut self.strategies {
                        let Some(signal) =
                            dispatcher.dispatch(strategy.as_mut(), &market, symbol, now)
                        else {
                            continue;
                        };
                        if ledger.try_open(
                            &signal,
                            candle,
                            &mut account,
                            self.risk_manager.as_deref(),
                        ) {
                            break;
                        }
                    }
                }

                ledger.check_exit(symbol, candle, now, &mut account);
            }

            let unrealized = ledger.unrealized_total(&last_candles);
            tracker.mark(now, &mut account, unrealized);

            if tracker.check_breakers(&account).is_some() {
                ledger.force_close_all(&last_candles, ExitReason::RiskBreaker, now, &mut account);
                risk_halted = true;
            }

            if (i + 1) % 1000 == 0 {
                debug!(
                    "bar {}/{}: balance {:.2}, open {}",
                    i + 1,
                    market.clock().len(),
                    account.balance,
                    ledger.open_count()
                );
            }
        }

        // Anything still open settles at its symbol's last seen candle.
        ledger.force_close_all(
            &last_candles,
            ExitReason::EndOfBacktest,
            last_tick,
            &mut account,
        );

        info!(
            "run finished: {} trades, final balance {:.2}",
            ledger.closed_trades().len(),
            account.balance
        );

        Ok(RunResult {
            trades: ledger.into_trades(),
            equity_curve: tracker.into_curve(),
            initial_balance: self.config.initial_balance,
            final_balance: account.balance,
            status,
            risk_halted,
            bar_count,
            symbols: market.symbols().to_vec(),
            skipped_symbols,
            soft_failures: dispatcher.soft_failures,
        })
    }
}
