//! Artifact writing against a real (temp) filesystem.

use chrono::{DateTime, TimeZone, Utc};
use fxlab_core::domain::{
    Direction, EquityPoint, ExitReason, Position, PositionStatus, Signal,
};
use fxlab_core::engine::run::{RunResult, RunStatus};
use fxlab_runner::{ArtifactManager, BacktestMetrics};

fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, hour, 0, 0).unwrap()
}

fn closed_trade(symbol: &str, entry: f64, exit: f64, pnl: f64) -> Position {
    let entry_time = ts(1);
    Position {
        id: Position::trade_id(symbol, entry_time),
        signal: Signal {
            symbol: symbol.to_string(),
            direction: Direction::Buy,
            price: Some(entry),
            stop_loss: Some(entry - 0.0050),
            take_profit: Some(entry + 0.0100),
            confidence: 60.0,
            strategy: "ma_cross".into(),
            timestamp: entry_time,
            max_holding_hours: None,
        },
        direction: Direction::Buy,
        size: 10_000.0,
        entry_price: entry,
        exit_price: Some(exit),
        entry_time,
        exit_time: Some(ts(6)),
        profit_loss: pnl,
        status: PositionStatus::Closed,
        exit_reason: Some(ExitReason::TakeProfit),
        commission: 1.5,
        slippage_cost: 0.4,
    }
}

fn sample_result() -> RunResult {
    let curve = vec![
        EquityPoint {
            timestamp: ts(1),
            balance: 10_000.0,
            equity: 10_000.0,
            drawdown: 0.0,
        },
        EquityPoint {
            timestamp: ts(2),
            balance: 10_000.0,
            equity: 10_050.0,
            drawdown: 0.0,
        },
        EquityPoint {
            timestamp: ts(6),
            balance: 10_100.0,
            equity: 10_100.0,
            drawdown: 0.0,
        },
    ];
    RunResult {
        trades: vec![
            closed_trade("EURUSD", 1.1000, 1.1100, 100.0),
            closed_trade("GBPUSD", 1.2500, 1.2510, 10.0),
        ],
        equity_curve: curve,
        initial_balance: 10_000.0,
        final_balance: 10_110.0,
        status: RunStatus::Completed,
        risk_halted: false,
        bar_count: 6,
        symbols: vec!["EURUSD".into(), "GBPUSD".into()],
        skipped_symbols: vec![],
        soft_failures: 0,
    }
}

#[test]
fn save_run_writes_the_full_artifact_set() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("abc123", &result, &metrics).unwrap();

    for path in [
        &paths.summary_txt,
        &paths.trades_csv,
        &paths.trades_json,
        &paths.equity_csv,
        &paths.report_markdown,
    ] {
        assert!(path.exists(), "{} missing", path.display());
        assert!(path.starts_with(dir.path().join("abc123")));
    }
}

#[test]
fn summary_is_parseable_key_value_lines() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("run1", &result, &metrics).unwrap();

    let body = std::fs::read_to_string(&paths.summary_txt).unwrap();
    for line in body.lines() {
        assert!(line.contains(": "), "bad summary line: {line}");
    }
    assert!(body.contains("status: COMPLETED"));
    assert!(body.contains("total_trades: 2"));
    assert!(body.contains("final_balance: 10110.00"));
    assert!(body.contains("symbol_pnl.EURUSD: 100.00"));
}

#[test]
fn trades_csv_has_a_row_per_trade() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("run1", &result, &metrics).unwrap();

    let body = std::fs::read_to_string(&paths.trades_csv).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3); // header + 2 trades
    assert!(lines[0].starts_with("id,symbol,direction"));
    assert!(lines[1].contains("EURUSD"));
    assert!(lines[1].contains(",BUY,"));
    assert!(lines[1].contains("TAKE_PROFIT"));
}

#[test]
fn trades_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("run1", &result, &metrics).unwrap();

    let body = std::fs::read_to_string(&paths.trades_json).unwrap();
    let trades: Vec<Position> = serde_json::from_str(&body).unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].symbol(), "EURUSD");
    assert_eq!(trades[0].exit_reason, Some(ExitReason::TakeProfit));
}

#[test]
fn equity_csv_has_a_row_per_point() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("run1", &result, &metrics).unwrap();

    let body = std::fs::read_to_string(&paths.equity_csv).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 points
    assert_eq!(lines[0], "timestamp,balance,equity,drawdown");
}

#[test]
fn markdown_report_mentions_winners() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result();
    let metrics = BacktestMetrics::from_result(&result);

    let manager = ArtifactManager::new(dir.path()).unwrap();
    let paths = manager.save_run("run1", &result, &metrics).unwrap();

    let body = std::fs::read_to_string(&paths.report_markdown).unwrap();
    assert!(body.contains("# FxLab Run Report"));
    assert!(body.contains("Run ID: `run1`"));
    assert!(body.contains("Top Winners"));
    assert!(body.contains("EURUSD"));
    assert!(body.contains("| BUY |"));
}
