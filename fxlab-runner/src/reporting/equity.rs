//! Equity curve export (CSV).

use anyhow::{Context, Result};
use fxlab_core::domain::EquityPoint;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_equity_csv(path: &Path, curve: &[EquityPoint]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writeln!(file, "timestamp,balance,equity,drawdown")?;
    for point in curve {
        writeln!(
            file,
            "{},{:.4},{:.4},{:.6}",
            point.timestamp.format("%Y-%m-%d %H:%M:%S"),
            point.balance,
            point.equity,
            point.drawdown
        )?;
    }
    Ok(())
}
