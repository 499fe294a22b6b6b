//! Position ledger: open/exit-check/close with the full execution cost
//! model (spread, slippage, commission, leverage).
//!
//! Invariant: at most one open position per symbol. A new signal for a
//! symbol that is already open is silently dropped — no netting, no
//! pyramiding. Rejections at open are business-rule drops, never errors.

use crate::config::BacktestConfig;
use crate::domain::{
    AccountState, Candle, Direction, ExitReason, Position, PositionStatus, Signal,
};
use crate::strategy::RiskManager;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;

/// Stop distances below this are treated as zero-risk and routed to the
/// fixed-fraction sizing fallback.
const MIN_STOP_DISTANCE: f64 = 1e-12;

pub struct PositionLedger {
    config: BacktestConfig,
    open: HashMap<String, Position>,
    closed: Vec<Position>,
}

impl PositionLedger {
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            open: HashMap::new(),
            closed: Vec::new(),
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn has_open(&self, symbol: &str) -> bool {
        self.open.contains_key(symbol)
    }

    pub fn open_positions(&self) -> Vec<&Position> {
        self.open.values().collect()
    }

    pub fn closed_trades(&self) -> &[Position] {
        &self.closed
    }

    /// Consume the ledger, yielding the immutable trade history.
    pub fn into_trades(self) -> Vec<Position> {
        self.closed
    }

    /// Attempt to open a position from a gated signal at this bar.
    ///
    /// Entry side is ask for buys, bid for sells; slippage always moves
    /// the fill against the trader. Entry commission is charged to the
    /// balance immediately — a sunk cost independent of the eventual P&L.
    /// Returns whether a position was opened.
    pub fn try_open(
        &mut self,
        signal: &Signal,
        candle: &Candle,
        account: &mut AccountState,
        risk_manager: Option<&dyn RiskManager>,
    ) -> bool {
        if !signal.is_actionable() {
            return false;
        }
        let symbol = signal.symbol.as_str();
        if self.open.contains_key(symbol) {
            debug!("{symbol}: signal dropped, position already open");
            return false;
        }
        if self.open.len() >= self.config.max_open_positions {
            debug!("{symbol}: signal dropped, max open positions reached");
            return false;
        }

        let half_spread = self.config.half_spread(symbol);
        let raw_price = match signal.direction {
            Direction::Buy => candle.ask_price(half_spread),
            Direction::Sell => candle.bid_price(half_spread),
            Direction::None => return false,
        };
        let entry_price = match signal.direction {
            Direction::Buy => raw_price * (1.0 + self.config.slippage_rate),
            _ => raw_price * (1.0 - self.config.slippage_rate),
        };
        if entry_price <= 0.0 {
            return false;
        }

        let size = match risk_manager {
            Some(rm) => {
                if !rm.validate_trade(signal, &self.open_positions()) {
                    debug!("{symbol}: signal rejected by risk manager");
                    return false;
                }
                rm.position_size(signal, account.balance)
            }
            None => self.fallback_size(signal, entry_price, account.balance),
        };
        if size <= 0.0 {
            debug!("{symbol}: signal dropped, size resolved to {size}");
            return false;
        }

        let commission = size * entry_price * self.config.commission_rate;
        let margin = size * entry_price / self.config.leverage;
        if margin + commission > account.balance {
            debug!(
                "{symbol}: signal dropped, margin {margin:.2} + commission {commission:.2} \
                 exceeds balance {:.2}",
                account.balance
            );
            return false;
        }

        account.balance -= commission;

        let entry_time = signal.timestamp;
        let position = Position {
            id: Position::trade_id(symbol, entry_time),
            signal: signal.clone(),
            direction: signal.direction,
            size,
            entry_price,
            exit_price: None,
            entry_time,
            exit_time: None,
            profit_loss: 0.0,
            status: PositionStatus::Open,
            exit_reason: None,
            commission,
            slippage_cost: (entry_price - raw_price).abs() * size,
        };
        debug!(
            "{symbol}: opened {:?} {size:.0} units at {entry_price:.5}",
            signal.direction
        );
        self.open.insert(symbol.to_string(), position);
        true
    }

    /// Fixed-fractional sizing used when no external risk manager is
    /// supplied: risk a configured fraction of balance against the stop
    /// distance, fall back to 1% of balance for zero-risk stops, and cap
    /// at the leverage-bounded notional.
    fn fallback_size(&self, signal: &Signal, entry_price: f64, balance: f64) -> f64 {
        let risk_amount = balance * self.config.risk_per_trade;
        let size = match signal.stop_loss {
            Some(stop) if (entry_price - stop).abs() > MIN_STOP_DISTANCE => {
                risk_amount / (entry_price - stop).abs()
            }
            _ => balance * 0.01,
        };
        size.min(balance * self.config.leverage / entry_price)
    }

    /// The slippage-free price the trader would realistically exit on:
    /// bid for longs, ask for shorts. Also the mark-to-market convention.
    fn exit_side_price(&self, position: &Position, candle: &Candle) -> f64 {
        let half_spread = self.config.half_spread(position.symbol());
        match position.direction {
            Direction::Buy => candle.bid_price(half_spread),
            _ => candle.ask_price(half_spread),
        }
    }

    /// Evaluate exit conditions for the open position on `symbol` (if
    /// any) and close it when one fires. Precedence: stop-loss, then
    /// take-profit, then max holding time.
    pub fn check_exit(
        &mut self,
        symbol: &str,
        candle: &Candle,
        now: DateTime<Utc>,
        account: &mut AccountState,
    ) -> Option<ExitReason> {
        let position = self.open.get(symbol)?;
        let current = self.exit_side_price(position, candle);

        let reason = match position.direction {
            Direction::Buy => {
                if position.signal.stop_loss.is_some_and(|sl| current <= sl) {
                    Some(ExitReason::StopLoss)
                } else if position.signal.take_profit.is_some_and(|tp| current >= tp) {
                    Some(ExitReason::TakeProfit)
                } else {
                    None
                }
            }
            _ => {
                if position.signal.stop_loss.is_some_and(|sl| current >= sl) {
                    Some(ExitReason::StopLoss)
                } else if position.signal.take_profit.is_some_and(|tp| current <= tp) {
                    Some(ExitReason::TakeProfit)
                } else {
                    None
                }
            }
        };
        let reason = reason.or_else(|| {
            let held_hours = (now - position.entry_time).num_seconds() as f64 / 3600.0;
            match position.signal.max_holding_hours {
                Some(max) if held_hours >= max => Some(ExitReason::MaxTime),
                _ => None,
            }
        })?;

        self.close(symbol, candle, reason, now, account);
        Some(reason)
    }

    /// Close the open position on `symbol` at this candle.
    ///
    /// Exit fill is the exit-side price moved against the trader by the
    /// slippage rate. Raw P&L is leveraged, exit commission comes out of
    /// it, and the net lands on the balance in one move — so the balance
    /// delta of a close is exactly the trade's recorded `profit_loss`.
    pub fn close(
        &mut self,
        symbol: &str,
        candle: &Candle,
        reason: ExitReason,
        now: DateTime<Utc>,
        account: &mut AccountState,
    ) {
        let Some(mut position) = self.open.remove(symbol) else {
            return;
        };
        let raw_price = self.exit_side_price(&position, candle);
        let exit_price = match position.direction {
            Direction::Buy => raw_price * (1.0 - self.config.slippage_rate),
            _ => raw_price * (1.0 + self.config.slippage_rate),
        };

        let raw_pnl = match position.direction {
            Direction::Buy => (exit_price - position.entry_price) * position.size,
            _ => (position.entry_price - exit_price) * position.size,
        };
        let exit_commission = position.size * exit_price * self.config.commission_rate;
        let net_pnl = raw_pnl * self.config.leverage - exit_commission;

        account.balance += net_pnl;

        position.exit_price = Some(exit_price);
        position.exit_time = Some(now);
        position.profit_loss = net_pnl;
        position.status = PositionStatus::Closed;
        position.exit_reason = Some(reason);
        position.commission += exit_commission;
        position.slippage_cost += (exit_price - raw_price).abs() * position.size;

        debug!(
            "{symbol}: closed {} at {exit_price:.5}, pnl {net_pnl:+.2}",
            reason.as_str()
        );
        self.closed.push(position);
    }

    /// Force-close every open position at its symbol's latest candle.
    /// Used by the risk breakers and at end of run.
    pub fn force_close_all(
        &mut self,
        last_candles: &HashMap<String, Candle>,
        reason: ExitReason,
        now: DateTime<Utc>,
        account: &mut AccountState,
    ) {
        let symbols: Vec<String> = self.open.keys().cloned().collect();
        for symbol in symbols {
            match last_candles.get(&symbol) {
                Some(candle) => self.close(&symbol, candle, reason, now, account),
                None => {
                    // A position can only exist for a symbol that has
                    // produced at least one candle, so this is a bug.
                    warn!("{symbol}: no candle available for forced close");
                }
            }
        }
    }

    /// Mark-to-market P&L over all open positions, slippage-free.
    pub fn unrealized_total(&self, last_candles: &HashMap<String, Candle>) -> f64 {
        self.open
            .values()
            .map(|position| {
                last_candles
                    .get(position.symbol())
                    .map(|candle| {
                        let current = self.exit_side_price(position, candle);
                        position.unrealized_pnl(current, self.config.leverage)
                    })
                    .unwrap_or(0.0)
            })
            .sum()
    }
}
