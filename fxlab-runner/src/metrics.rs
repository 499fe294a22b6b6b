//! Performance metrics — pure functions over the frozen trade list and
//! equity curve. Calling them twice on the same inputs yields identical
//! results; nothing here touches the engine.

use fxlab_core::domain::{EquityPoint, Position};
use fxlab_core::engine::run::RunResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-bar risk-free hurdle in percent terms (~2% annualized over 365
/// days), matched against the percent return series.
const DAILY_RISK_FREE: f64 = 0.0055;

/// Annualization factor for Sharpe/Sortino. Applied uniformly regardless
/// of the configured timeframe — a known inconsistency kept on purpose.
const ANNUALIZATION: f64 = 252.0;

/// Aggregate statistics for one backtest run.
///
/// `profit_factor` and `sortino_ratio` can be `+inf` (lossless runs,
/// no negative returns); everything else is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_return: f64,
    pub total_return_pct: f64,
    /// Percent of trades with positive P&L.
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub annualized_return_pct: f64,
    pub calmar_ratio: f64,
    pub avg_trade_duration_hours: f64,
    /// Summed P&L per symbol, only for symbols with at least one trade.
    pub symbol_performance: HashMap<String, f64>,
    pub initial_balance: f64,
    pub final_balance: f64,
}

impl BacktestMetrics {
    pub fn from_result(result: &RunResult) -> Self {
        Self::compute(
            &result.trades,
            &result.equity_curve,
            result.initial_balance,
            result.final_balance,
        )
    }

    /// Compute all statistics from a frozen trade list and equity curve.
    pub fn compute(
        trades: &[Position],
        equity_curve: &[EquityPoint],
        initial_balance: f64,
        final_balance: f64,
    ) -> Self {
        let total_trades = trades.len();
        let winners: Vec<f64> = trades
            .iter()
            .filter(|t| t.profit_loss > 0.0)
            .map(|t| t.profit_loss)
            .collect();
        let losers: Vec<f64> = trades
            .iter()
            .filter(|t| t.profit_loss <= 0.0)
            .map(|t| t.profit_loss)
            .collect();

        let total_return = final_balance - initial_balance;
        let total_return_pct = if initial_balance > 0.0 {
            total_return / initial_balance * 100.0
        } else {
            0.0
        };

        let win_rate = if total_trades > 0 {
            winners.len() as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let gross_profit: f64 = winners.iter().sum();
        let gross_loss: f64 = losers.iter().map(|p| p.abs()).sum();
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = mean(&winners);
        let avg_loss = mean(&losers);
        let largest_win = winners.iter().copied().fold(f64::NAN, f64::max);
        let largest_loss = losers.iter().copied().fold(f64::NAN, f64::min);

        let returns = percent_returns(equity_curve);
        let sharpe_ratio = sharpe(&returns);
        let sortino_ratio = sortino(&returns);
        let max_drawdown_pct = equity_curve
            .iter()
            .map(|p| p.drawdown)
            .fold(0.0, f64::max)
            * 100.0;

        let annualized_return_pct =
            annualized_return(equity_curve, initial_balance, final_balance);
        let calmar_ratio = if max_drawdown_pct > 0.0 {
            annualized_return_pct / max_drawdown_pct
        } else {
            0.0
        };

        let durations: Vec<f64> = trades.iter().filter_map(|t| t.duration_hours()).collect();
        let avg_trade_duration_hours = mean(&durations);

        let mut symbol_performance: HashMap<String, f64> = HashMap::new();
        for trade in trades {
            *symbol_performance
                .entry(trade.symbol().to_string())
                .or_insert(0.0) += trade.profit_loss;
        }

        Self {
            total_trades,
            winning_trades: winners.len(),
            losing_trades: losers.len(),
            total_return,
            total_return_pct,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win: if largest_win.is_nan() { 0.0 } else { largest_win },
            largest_loss: if largest_loss.is_nan() { 0.0 } else { largest_loss },
            max_drawdown_pct,
            sharpe_ratio,
            sortino_ratio,
            annualized_return_pct,
            calmar_ratio,
            avg_trade_duration_hours,
            symbol_performance,
            initial_balance,
            final_balance,
        }
    }
}

// ─── Return series helpers ──────────────────────────────────────────

/// Percent returns between consecutive equity samples.
pub fn percent_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity / w[0].equity - 1.0) * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Annualized Sharpe over the percent return series. 0 when the series
/// is too short or flat.
fn sharpe(returns: &[f64]) -> f64 {
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean(returns) - DAILY_RISK_FREE) / std * ANNUALIZATION.sqrt()
}

/// Sortino: same numerator as Sharpe, denominator from the negative
/// returns only. `+inf` when there is no downside at all.
fn sortino(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if negatives.is_empty() {
        return f64::INFINITY;
    }
    let downside_std = std_dev(&negatives);
    if downside_std < 1e-15 {
        return 0.0;
    }
    (mean(returns) - DAILY_RISK_FREE) / downside_std * ANNUALIZATION.sqrt()
}

/// Compound annual growth in percent, over calendar days between the
/// first and last equity samples.
fn annualized_return(
    equity_curve: &[EquityPoint],
    initial_balance: f64,
    final_balance: f64,
) -> f64 {
    if equity_curve.len() < 2 || initial_balance <= 0.0 || final_balance <= 0.0 {
        return 0.0;
    }
    let first = equity_curve[0].timestamp;
    let last = equity_curve[equity_curve.len() - 1].timestamp;
    let elapsed_days = (last - first).num_seconds() as f64 / 86_400.0;
    if elapsed_days <= 0.0 {
        return 0.0;
    }
    ((final_balance / initial_balance).powf(365.0 / elapsed_days) - 1.0) * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
