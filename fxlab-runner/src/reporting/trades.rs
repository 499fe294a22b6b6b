//! Trade tape export (CSV/JSON).

use anyhow::{Context, Result};
use fxlab_core::domain::Position;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_trades_csv(path: &Path, trades: &[Position]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writeln!(
        file,
        "id,symbol,direction,strategy,entry_time,exit_time,entry_price,exit_price,size,\
         profit_loss,commission,slippage_cost,exit_reason,confidence,duration_hours"
    )?;

    for trade in trades {
        writeln!(
            file,
            "{},{},{},{},{},{},{:.5},{},{:.2},{:.4},{:.4},{:.4},{},{:.1},{}",
            trade.id,
            trade.symbol(),
            trade.direction.as_str(),
            trade.signal.strategy,
            trade.entry_time.format("%Y-%m-%d %H:%M:%S"),
            trade
                .exit_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            trade.entry_price,
            trade
                .exit_price
                .map(|p| format!("{p:.5}"))
                .unwrap_or_default(),
            trade.size,
            trade.profit_loss,
            trade.commission,
            trade.slippage_cost,
            trade.exit_reason.map(|r| r.as_str()).unwrap_or(""),
            trade.signal.confidence,
            trade
                .duration_hours()
                .map(|h| format!("{h:.2}"))
                .unwrap_or_default(),
        )?;
    }

    Ok(())
}

pub fn write_trades_json(path: &Path, trades: &[Position]) -> Result<()> {
    let json = serde_json::to_string_pretty(trades).context("failed to serialize trades")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write trades JSON {}", path.display()))?;
    Ok(())
}
