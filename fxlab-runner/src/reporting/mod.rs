//! Artifact manager for persisting run outputs.

mod equity;
mod markdown;
mod summary;
mod trades;

use crate::metrics::BacktestMetrics;
use anyhow::{Context, Result};
use fxlab_core::engine::run::RunResult;
use std::path::{Path, PathBuf};

pub use markdown::render_markdown;
pub use summary::render_summary;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub summary_txt: PathBuf,
    pub trades_csv: PathBuf,
    pub trades_json: PathBuf,
    pub equity_csv: PathBuf,
    pub report_markdown: PathBuf,
}

/// Writes all artifacts for a run under `<output_dir>/<run_id>/`.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    /// Save the complete artifact set for a finished run.
    pub fn save_run(
        &self,
        run_id: &str,
        result: &RunResult,
        metrics: &BacktestMetrics,
    ) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(run_id);
        std::fs::create_dir_all(&run_dir).context("failed to create run artifact directory")?;

        let summary_txt = run_dir.join("summary.txt");
        std::fs::write(&summary_txt, render_summary(result, metrics))
            .with_context(|| format!("failed to write {}", summary_txt.display()))?;

        let trades_csv = run_dir.join("trades.csv");
        trades::write_trades_csv(&trades_csv, &result.trades)?;

        let trades_json = run_dir.join("trades.json");
        trades::write_trades_json(&trades_json, &result.trades)?;

        let equity_csv = run_dir.join("equity.csv");
        equity::write_equity_csv(&equity_csv, &result.equity_curve)?;

        let report_markdown = run_dir.join("report.md");
        std::fs::write(&report_markdown, render_markdown(run_id, result, metrics))
            .with_context(|| format!("failed to write {}", report_markdown.display()))?;

        Ok(ArtifactPaths {
            summary_txt,
            trades_csv,
            trades_json,
            equity_csv,
            report_markdown,
        })
    }
}
