//! Market data: provider trait and multi-symbol alignment.

pub mod align;
pub mod provider;

pub use align::AlignedMarket;
pub use provider::{DataError, DataProvider};
