//! Mark-to-market equity tracking and the global risk breakers.

use crate::domain::{AccountState, EquityPoint};
use chrono::{DateTime, Utc};
use log::warn;

/// Drawdown level beyond which all open positions are force-closed.
const MAX_DRAWDOWN_BREAKER: f64 = 0.5;
/// Balance floor as a fraction of initial balance.
const MIN_BALANCE_FRACTION: f64 = 0.1;

/// Why a breaker fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerTrip {
    DrawdownExceeded,
    BalanceDepleted,
}

/// Records one equity snapshot per simulated bar and checks the
/// emergency breakers after each update.
#[derive(Debug)]
pub struct EquityTracker {
    initial_balance: f64,
    curve: Vec<EquityPoint>,
}

impl EquityTracker {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            curve: Vec::new(),
        }
    }

    /// Recompute equity, roll peak/drawdown forward, and append a curve
    /// point. Returns the equity for this bar.
    pub fn mark(
        &mut self,
        timestamp: DateTime<Utc>,
        account: &mut AccountState,
        unrealized_pnl: f64,
    ) -> f64 {
        let equity = account.balance + unrealized_pnl;
        account.mark(equity);
        self.curve.push(EquityPoint {
            timestamp,
            balance: account.balance,
            equity,
            drawdown: account.drawdown,
        });
        equity
    }

    /// Check the emergency breakers. A trip force-closes everything but
    /// never terminates the bar loop: a depleted balance simply stops
    /// passing the sizing and margin gates for the rest of the run.
    pub fn check_breakers(&self, account: &AccountState) -> Option<BreakerTrip> {
        if account.drawdown > MAX_DRAWDOWN_BREAKER {
            warn!(
                "drawdown breaker tripped: {:.1}% > {:.0}%",
                account.drawdown * 100.0,
                MAX_DRAWDOWN_BREAKER * 100.0
            );
            return Some(BreakerTrip::DrawdownExceeded);
        }
        if account.balance < self.initial_balance * MIN_BALANCE_FRACTION {
            warn!(
                "balance breaker tripped: {:.2} < {:.2}",
                account.balance,
                self.initial_balance * MIN_BALANCE_FRACTION
            );
            return Some(BreakerTrip::BalanceDepleted);
        }
        None
    }

    pub fn curve(&self) -> &[EquityPoint] {
        &self.curve
    }

    pub fn into_curve(self) -> Vec<EquityPoint> {
        self.curve
    }
}
