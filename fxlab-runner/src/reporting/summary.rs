//! Plain-text run summary: one `key: value` line per metric.

use crate::metrics::BacktestMetrics;
use fxlab_core::engine::run::{RunResult, RunStatus};
use std::fmt::Write;

/// Ratios that can legitimately be infinite print as a bare `inf`.
fn fmt_ratio(v: f64) -> String {
    if v.is_infinite() {
        "inf".to_string()
    } else {
        format!("{v:.4}")
    }
}

pub fn render_summary(result: &RunResult, metrics: &BacktestMetrics) -> String {
    let mut out = String::new();
    let status = match result.status {
        RunStatus::Completed => "COMPLETED",
        RunStatus::Cancelled => "CANCELLED",
    };

    // Writes to a String cannot fail.
    let _ = writeln!(out, "status: {status}");
    let _ = writeln!(out, "risk_halted: {}", result.risk_halted);
    let _ = writeln!(out, "symbols: {}", result.symbols.join(","));
    let _ = writeln!(out, "skipped_symbols: {}", result.skipped_symbols.join(","));
    let _ = writeln!(out, "bars: {}", result.bar_count);
    let _ = writeln!(out, "soft_failures: {}", result.soft_failures);
    let _ = writeln!(out, "initial_balance: {:.2}", metrics.initial_balance);
    let _ = writeln!(out, "final_balance: {:.2}", metrics.final_balance);
    let _ = writeln!(out, "total_return: {:.2}", metrics.total_return);
    let _ = writeln!(out, "total_return_pct: {:.2}", metrics.total_return_pct);
    let _ = writeln!(out, "total_trades: {}", metrics.total_trades);
    let _ = writeln!(out, "winning_trades: {}", metrics.winning_trades);
    let _ = writeln!(out, "losing_trades: {}", metrics.losing_trades);
    let _ = writeln!(out, "win_rate: {:.2}", metrics.win_rate);
    let _ = writeln!(out, "profit_factor: {}", fmt_ratio(metrics.profit_factor));
    let _ = writeln!(out, "avg_win: {:.2}", metrics.avg_win);
    let _ = writeln!(out, "avg_loss: {:.2}", metrics.avg_loss);
    let _ = writeln!(out, "largest_win: {:.2}", metrics.largest_win);
    let _ = writeln!(out, "largest_loss: {:.2}", metrics.largest_loss);
    let _ = writeln!(out, "max_drawdown_pct: {:.2}", metrics.max_drawdown_pct);
    let _ = writeln!(out, "sharpe_ratio: {:.4}", metrics.sharpe_ratio);
    let _ = writeln!(out, "sortino_ratio: {}", fmt_ratio(metrics.sortino_ratio));
    let _ = writeln!(
        out,
        "annualized_return_pct: {:.2}",
        metrics.annualized_return_pct
    );
    let _ = writeln!(out, "calmar_ratio: {:.4}", metrics.calmar_ratio);
    let _ = writeln!(
        out,
        "avg_trade_duration_hours: {:.2}",
        metrics.avg_trade_duration_hours
    );

    let mut symbols: Vec<_> = metrics.symbol_performance.iter().collect();
    symbols.sort_by(|a, b| a.0.cmp(b.0));
    for (symbol, pnl) in symbols {
        let _ = writeln!(out, "symbol_pnl.{symbol}: {pnl:.2}");
    }

    out
}
