//! Account state and the append-only equity curve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Realized cash plus drawdown bookkeeping.
///
/// `balance` moves only on position close and on the entry-commission
/// charge at open. `peak` is a monotone high-water mark of equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountState {
    pub balance: f64,
    pub peak: f64,
    pub drawdown: f64,
    pub max_drawdown: f64,
}

impl AccountState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            peak: initial_balance,
            drawdown: 0.0,
            max_drawdown: 0.0,
        }
    }

    /// Update peak/drawdown from the current mark-to-market equity.
    ///
    /// A new equity high resets drawdown to zero; otherwise drawdown is
    /// the proportional decline from the peak.
    pub fn mark(&mut self, equity: f64) {
        if equity > self.peak {
            self.peak = equity;
            self.drawdown = 0.0;
        } else if self.peak > 0.0 {
            self.drawdown = (self.peak - equity) / self.peak;
            if self.drawdown > self.max_drawdown {
                self.max_drawdown = self.drawdown;
            }
        }
    }
}

/// One equity curve sample, appended every simulated bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub balance: f64,
    pub equity: f64,
    pub drawdown: f64,
}
