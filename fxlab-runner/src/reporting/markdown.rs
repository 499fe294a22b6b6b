//! Markdown report generator.

use crate::metrics::BacktestMetrics;
use fxlab_core::engine::run::{RunResult, RunStatus};

pub fn render_markdown(run_id: &str, result: &RunResult, metrics: &BacktestMetrics) -> String {
    let status = match result.status {
        RunStatus::Completed => "COMPLETED",
        RunStatus::Cancelled => "CANCELLED",
    };

    let mut report = format!(
        "# FxLab Run Report\n\n\
Run ID: `{}`\n\
Status: {}{}\n\n\
## Summary\n\
- Total Return: {:+.2}%\n\
- Annualized: {:+.2}%\n\
- Sharpe: {:.2}\n\
- Sortino: {:.2}\n\
- Calmar: {:.2}\n\
- Max Drawdown: {:.2}%\n\
- Win Rate: {:.1}%\n\
- Profit Factor: {:.2}\n\
- Trades: {}\n\
- Avg Holding: {:.1}h\n",
        run_id,
        status,
        if result.risk_halted {
            " (risk breaker fired)"
        } else {
            ""
        },
        metrics.total_return_pct,
        metrics.annualized_return_pct,
        metrics.sharpe_ratio,
        metrics.sortino_ratio,
        metrics.calmar_ratio,
        metrics.max_drawdown_pct,
        metrics.win_rate,
        metrics.profit_factor,
        metrics.total_trades,
        metrics.avg_trade_duration_hours,
    );

    if !metrics.symbol_performance.is_empty() {
        report.push_str("\n## Per-Symbol P&L\n\n");
        report.push_str("| Symbol | P&L |\n");
        report.push_str("|--------|-----|\n");
        let mut symbols: Vec<_> = metrics.symbol_performance.iter().collect();
        symbols.sort_by(|a, b| a.0.cmp(b.0));
        for (symbol, pnl) in symbols {
            report.push_str(&format!("| {} | ${:+.2} |\n", symbol, pnl));
        }
    }

    // Trade tape section (top 5 winners and losers)
    if !result.trades.is_empty() {
        report.push_str("\n## Trade Tape\n\n");

        let mut sorted_trades: Vec<_> = result.trades.iter().collect();
        sorted_trades.sort_by(|a, b| {
            b.profit_loss
                .partial_cmp(&a.profit_loss)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        report.push_str("### Top Winners\n");
        report.push_str("| Symbol | Direction | Entry | Exit | P&L | Reason |\n");
        report.push_str("|--------|-----------|-------|------|-----|--------|\n");
        for trade in sorted_trades.iter().take(5).filter(|t| t.profit_loss > 0.0) {
            report.push_str(&trade_row(trade));
        }

        report.push_str("\n### Top Losers\n");
        report.push_str("| Symbol | Direction | Entry | Exit | P&L | Reason |\n");
        report.push_str("|--------|-----------|-------|------|-----|--------|\n");
        for trade in sorted_trades
            .iter()
            .rev()
            .take(5)
            .filter(|t| t.profit_loss <= 0.0)
        {
            report.push_str(&trade_row(trade));
        }
    }

    if result.soft_failures > 0 || !result.skipped_symbols.is_empty() {
        report.push_str("\n## Diagnostics\n\n");
        if !result.skipped_symbols.is_empty() {
            report.push_str(&format!(
                "- Skipped symbols (no data): {}\n",
                result.skipped_symbols.join(", ")
            ));
        }
        if result.soft_failures > 0 {
            report.push_str(&format!(
                "- Strategy faults swallowed: {}\n",
                result.soft_failures
            ));
        }
    }

    report.push_str(
        "\n## Notes\n\
- Equity curve and trades are exported alongside this report.\n",
    );

    report
}

fn trade_row(trade: &fxlab_core::domain::Position) -> String {
    format!(
        "| {} | {} | {:.5} | {} | ${:+.2} | {} |\n",
        trade.symbol(),
        trade.direction.as_str(),
        trade.entry_price,
        trade
            .exit_price
            .map(|p| format!("{p:.5}"))
            .unwrap_or_else(|| "-".to_string()),
        trade.profit_loss,
        trade.exit_reason.map(|r| r.as_str()).unwrap_or("-"),
    )
}
