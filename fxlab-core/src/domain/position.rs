//! Position — one open or closed trade, with full cost traceability.

use super::signal::{Direction, Signal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a position. The only transition is Open → Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Signal-specified max holding duration elapsed.
    MaxTime,
    /// Emergency de-risking: drawdown or balance breaker fired.
    RiskBreaker,
    /// Still open when the clock ran out; closed at the last bar.
    EndOfBacktest,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::TakeProfit => "TAKE_PROFIT",
            ExitReason::MaxTime => "MAX_TIME",
            ExitReason::RiskBreaker => "RISK_BREAKER",
            ExitReason::EndOfBacktest => "END_OF_BACKTEST",
        }
    }
}

/// One trade, from gated signal to (eventual) close.
///
/// Entry and exit prices are fill prices — slippage already applied.
/// `commission` and `slippage_cost` accumulate both legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Unique across a run: `"{symbol}_{entry time as %Y%m%d_%H%M%S}"`.
    pub id: String,
    /// The signal that opened this position.
    pub signal: Signal,
    pub direction: Direction,
    pub size: f64,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    /// Realized net P&L in account currency. 0.0 while open.
    pub profit_loss: f64,
    pub status: PositionStatus,
    pub exit_reason: Option<ExitReason>,
    /// Entry + exit commission.
    pub commission: f64,
    /// Adverse fill movement, both legs, in account currency.
    pub slippage_cost: f64,
}

impl Position {
    pub fn trade_id(symbol: &str, entry_time: DateTime<Utc>) -> String {
        format!("{}_{}", symbol, entry_time.format("%Y%m%d_%H%M%S"))
    }

    pub fn symbol(&self) -> &str {
        &self.signal.symbol
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// Mark-to-market P&L against a slippage-free current price.
    pub fn unrealized_pnl(&self, current_price: f64, leverage: f64) -> f64 {
        let raw = match self.direction {
            Direction::Buy => (current_price - self.entry_price) * self.size,
            Direction::Sell => (self.entry_price - current_price) * self.size,
            Direction::None => 0.0,
        };
        raw * leverage
    }

    /// Holding time in hours, if both timestamps are set.
    pub fn duration_hours(&self) -> Option<f64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_seconds() as f64 / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_position() -> Position {
        let entry_time = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        Position {
            id: Position::trade_id("EURUSD", entry_time),
            signal: Signal {
                symbol: "EURUSD".into(),
                direction: Direction::Buy,
                price: Some(1.1000),
                stop_loss: Some(1.0950),
                take_profit: Some(1.1100),
                confidence: 60.0,
                strategy: "test".into(),
                timestamp: entry_time,
                max_holding_hours: None,
            },
            direction: Direction::Buy,
            size: 10_000.0,
            entry_price: 1.1001,
            exit_price: None,
            entry_time,
            exit_time: None,
            profit_loss: 0.0,
            status: PositionStatus::Open,
            exit_reason: None,
            commission: 0.0,
            slippage_cost: 0.0,
        }
    }

    #[test]
    fn trade_id_format() {
        let entry_time = Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 5).unwrap();
        assert_eq!(
            Position::trade_id("EURUSD", entry_time),
            "EURUSD_20240102_123005"
        );
    }

    #[test]
    fn unrealized_pnl_long() {
        let pos = sample_position();
        let pnl = pos.unrealized_pnl(1.1051, 1.0);
        assert!((pnl - 10_000.0 * 0.0050).abs() < 1e-6);
    }

    #[test]
    fn unrealized_pnl_short_with_leverage() {
        let mut pos = sample_position();
        pos.direction = Direction::Sell;
        let pnl = pos.unrealized_pnl(1.0951, 10.0);
        assert!((pnl - 10_000.0 * 0.0050 * 10.0).abs() < 1e-6);
    }

    #[test]
    fn duration_in_hours() {
        let mut pos = sample_position();
        pos.exit_time = Some(pos.entry_time + chrono::Duration::hours(36));
        assert_eq!(pos.duration_hours(), Some(36.0));
    }

    #[test]
    fn exit_reason_wire_names() {
        assert_eq!(ExitReason::StopLoss.as_str(), "STOP_LOSS");
        assert_eq!(ExitReason::EndOfBacktest.as_str(), "END_OF_BACKTEST");
    }
}
