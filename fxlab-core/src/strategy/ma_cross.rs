//! Moving average crossover strategy.
//!
//! Classic trend-following entry:
//! - Buy when the fast MA crosses above the slow MA
//! - Sell when the fast MA crosses below the slow MA
//! - No signal when there is no fresh cross
//!
//! Stops and targets are placed a fixed pip distance from the close.

use super::Strategy;
use crate::domain::{pip_size, Candle, Direction, Signal};

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast_period: usize,
    slow_period: usize,
    /// Stop-loss distance in pips.
    stop_pips: f64,
    /// Take-profit distance in pips.
    target_pips: f64,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period > 0, "fast_period must be > 0");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );
        Self {
            fast_period,
            slow_period,
            stop_pips: 50.0,
            target_pips: 100.0,
        }
    }

    pub fn with_stops(mut self, stop_pips: f64, target_pips: f64) -> Self {
        self.stop_pips = stop_pips;
        self.target_pips = target_pips;
        self
    }

    fn sma(window: &[Candle], period: usize) -> Option<f64> {
        if window.len() < period {
            return None;
        }
        let recent = &window[window.len() - period..];
        Some(recent.iter().map(|c| c.close).sum::<f64>() / period as f64)
    }

    /// Some(Buy)/Some(Sell) on a fresh cross this bar, None otherwise.
    fn detect_cross(&self, window: &[Candle]) -> Option<Direction> {
        if window.len() < self.slow_period + 1 {
            return None;
        }
        let fast_now = Self::sma(window, self.fast_period)?;
        let slow_now = Self::sma(window, self.slow_period)?;
        let prev = &window[..window.len() - 1];
        let fast_prev = Self::sma(prev, self.fast_period)?;
        let slow_prev = Self::sma(prev, self.slow_period)?;

        if fast_prev <= slow_prev && fast_now > slow_now {
            Some(Direction::Buy)
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            Some(Direction::Sell)
        } else {
            None
        }
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_cross"
    }

    fn generate_signal(
        &mut self,
        window: &[Candle],
        symbol: &str,
    ) -> anyhow::Result<Option<Signal>> {
        let Some(direction) = self.detect_cross(window) else {
            return Ok(None);
        };
        let Some(last) = window.last() else {
            return Ok(None);
        };
        let pip = pip_size(symbol);
        let (stop_loss, take_profit) = match direction {
            Direction::Buy => (
                last.close - self.stop_pips * pip,
                last.close + self.target_pips * pip,
            ),
            _ => (
                last.close + self.stop_pips * pip,
                last.close - self.target_pips * pip,
            ),
        };

        Ok(Some(Signal {
            symbol: symbol.to_string(),
            direction,
            price: Some(last.close),
            stop_loss: Some(stop_loss),
            take_profit: Some(take_profit),
            confidence: 60.0,
            strategy: self.name().to_string(),
            timestamp: last.timestamp,
            max_holding_hours: None,
        }))
    }

    fn required_periods(&self) -> usize {
        self.slow_period + 1
    }
}
