//! Core domain types shared across the engine.

pub mod account;
pub mod candle;
pub mod position;
pub mod signal;

pub use account::{AccountState, EquityPoint};
pub use candle::{pip_size, Candle};
pub use position::{ExitReason, Position, PositionStatus};
pub use signal::{Direction, Signal};
