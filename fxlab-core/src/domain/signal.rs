//! Signal — a strategy's trade proposal for one symbol at one bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
    /// No actionable opportunity. Signals with this direction never reach
    /// the ledger.
    None,
}

impl Direction {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::None => "NONE",
        }
    }
}

/// A strategy-produced trade proposal.
///
/// Stop-loss, take-profit, and max-holding are explicit optional fields so
/// a missing value is a type, not a silent default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    /// Reference price the strategy saw. `None` means "no actionable
    /// opportunity" regardless of direction.
    pub price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    /// Confidence score, 0–100.
    pub confidence: f64,
    /// Identifier of the strategy that produced this signal.
    pub strategy: String,
    /// Re-stamped by the dispatcher to the current simulation clock tick,
    /// so strategies cannot smuggle in stale or future timestamps.
    pub timestamp: DateTime<Utc>,
    /// Maximum holding duration in hours before a forced `MaxTime` exit.
    pub max_holding_hours: Option<f64>,
}

impl Signal {
    /// Whether this signal can be executed: a firm direction and a
    /// reference price.
    pub fn is_actionable(&self) -> bool {
        matches!(self.direction, Direction::Buy | Direction::Sell) && self.price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_signal() -> Signal {
        Signal {
            symbol: "EURUSD".into(),
            direction: Direction::Buy,
            price: Some(1.1000),
            stop_loss: Some(1.0950),
            take_profit: Some(1.1100),
            confidence: 70.0,
            strategy: "ma_cross".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
            max_holding_hours: None,
        }
    }

    #[test]
    fn buy_with_price_is_actionable() {
        assert!(sample_signal().is_actionable());
    }

    #[test]
    fn none_direction_is_not_actionable() {
        let mut signal = sample_signal();
        signal.direction = Direction::None;
        assert!(!signal.is_actionable());
    }

    #[test]
    fn missing_price_is_not_actionable() {
        let mut signal = sample_signal();
        signal.price = None;
        assert!(!signal.is_actionable());
    }

    #[test]
    fn direction_serializes_screaming() {
        let json = serde_json::to_string(&Direction::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
        let json = serde_json::to_string(&Direction::None).unwrap();
        assert_eq!(json, "\"NONE\"");
    }

    #[test]
    fn direction_wire_names() {
        assert_eq!(Direction::Buy.as_str(), "BUY");
        assert_eq!(Direction::Sell.as_str(), "SELL");
        assert_eq!(Direction::None.as_str(), "NONE");
    }
}
