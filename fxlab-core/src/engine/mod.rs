//! The simulation engine: signal dispatch, position ledger, equity
//! tracking, and the bar loop itself.

pub mod dispatcher;
pub mod equity;
pub mod ledger;
pub mod run;

pub use dispatcher::SignalDispatcher;
pub use equity::EquityTracker;
pub use ledger::PositionLedger;
pub use run::{Backtester, RunResult, RunStatus};
