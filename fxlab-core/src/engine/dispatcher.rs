//! Signal dispatch: bounded look-back windows, warm-up guard, and the
//! soft-failure channel for misbehaving strategies.

use crate::data::AlignedMarket;
use crate::domain::Signal;
use crate::strategy::Strategy;
use chrono::{DateTime, Utc};
use log::warn;

/// Look-back length used when a strategy declares none (0).
const DEFAULT_LOOKBACK: usize = 50;

/// Per-bar signal dispatch for one symbol.
#[derive(Debug, Default)]
pub struct SignalDispatcher {
    /// Strategy faults swallowed so far (visible in run diagnostics).
    pub soft_failures: usize,
}

impl SignalDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `strategy` for a signal on `symbol` at the current clock tick.
    ///
    /// Returns `None` when the symbol's history is still inside the
    /// warm-up window, when the strategy declines, or when it fails —
    /// a strategy error is logged and never aborts the run. A produced
    /// signal is re-stamped to the simulation clock so strategies cannot
    /// emit stale or future timestamps.
    pub fn dispatch(
        &mut self,
        strategy: &mut dyn Strategy,
        market: &AlignedMarket,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let lookback = match strategy.required_periods() {
            0 => DEFAULT_LOOKBACK,
            n => n,
        };

        let history = market.history_to(symbol, now)?;
        if history.len() < lookback {
            return None;
        }
        let window = &history[history.len() - lookback..];

        match strategy.generate_signal(window, symbol) {
            Ok(Some(mut signal)) => {
                signal.timestamp = now;
                Some(signal)
            }
            Ok(None) => None,
            Err(e) => {
                self.soft_failures += 1;
                warn!(
                    "strategy '{}' failed on {symbol} at {now}: {e:#}",
                    strategy.name()
                );
                None
            }
        }
    }
}
