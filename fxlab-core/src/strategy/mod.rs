//! Strategy and risk-manager seams.
//!
//! Both are external collaborators from the engine's point of view: the
//! engine only needs a signal per (symbol, bar) window and a yes/no plus
//! a size per gated signal.

pub mod ma_cross;

use crate::domain::{Candle, Position, Signal};

pub use ma_cross::MaCrossover;

/// A signal-generating strategy.
///
/// `generate_signal` receives a bounded look-back window of the symbol's
/// own candles, newest last, at least `required_periods` rows long. An
/// `Err` is a soft failure: the dispatcher logs it and treats it as "no
/// signal" for that symbol at that bar.
pub trait Strategy: Send {
    /// Identifier stamped onto produced signals.
    fn name(&self) -> &str;

    fn generate_signal(
        &mut self,
        window: &[Candle],
        symbol: &str,
    ) -> anyhow::Result<Option<Signal>>;

    /// Minimum candle count before this strategy is asked for a signal.
    /// Guards against warm-up artifacts.
    fn required_periods(&self) -> usize {
        50
    }
}

/// External risk gate and position sizer.
///
/// When no risk manager is supplied the ledger falls back to
/// fixed-fractional sizing off the signal's stop distance.
pub trait RiskManager: Send {
    /// Whether this signal may open a position given the current open set.
    fn validate_trade(&self, signal: &Signal, open_positions: &[&Position]) -> bool;

    /// Position size in units for this signal; `<= 0` rejects the trade.
    fn position_size(&self, signal: &Signal, balance: f64) -> f64;
}
