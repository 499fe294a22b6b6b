//! Multi-symbol time alignment.
//!
//! The ordered intersection of all symbols' timestamps is the simulation
//! clock: every engine step advances exactly one tick, visiting symbols in
//! configured order. A symbol missing one tick is skipped for that bar
//! only, never dropped from the run.

use super::provider::DataError;
use crate::domain::Candle;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Per-symbol candle series indexed onto a common simulation clock.
#[derive(Debug)]
pub struct AlignedMarket {
    /// The common timestamp axis, sorted ascending.
    clock: Vec<DateTime<Utc>>,
    /// Symbols with data, in configured visiting order.
    symbols: Vec<String>,
    series: HashMap<String, Vec<Candle>>,
    /// Per symbol: timestamp → index into that symbol's series.
    index: HashMap<String, HashMap<DateTime<Utc>, usize>>,
}

impl AlignedMarket {
    /// Intersect all series' timestamps into one clock.
    ///
    /// `order` fixes the per-bar visiting order; symbols absent from the
    /// series map (no data this run) are dropped from it. Fails when no
    /// symbol has data or the common clock has fewer than two ticks.
    pub fn build(
        series: HashMap<String, Vec<Candle>>,
        order: &[String],
    ) -> Result<Self, DataError> {
        let symbols: Vec<String> = order
            .iter()
            .filter(|s| series.get(*s).is_some_and(|c| !c.is_empty()))
            .cloned()
            .collect();

        if symbols.is_empty() {
            return Err(DataError::InsufficientData(
                "no symbol has usable market data".into(),
            ));
        }

        let mut common: Option<BTreeSet<DateTime<Utc>>> = None;
        for symbol in &symbols {
            let stamps: BTreeSet<DateTime<Utc>> =
                series[symbol].iter().map(|c| c.timestamp).collect();
            common = Some(match common {
                None => stamps,
                Some(acc) => acc.intersection(&stamps).copied().collect(),
            });
        }
        let clock: Vec<DateTime<Utc>> = common.unwrap_or_default().into_iter().collect();

        if clock.len() < 2 {
            return Err(DataError::InsufficientData(format!(
                "common clock across {} symbol(s) has {} tick(s); need at least 2",
                symbols.len(),
                clock.len()
            )));
        }

        let mut index = HashMap::new();
        for symbol in &symbols {
            let map: HashMap<DateTime<Utc>, usize> = series[symbol]
                .iter()
                .enumerate()
                .map(|(i, c)| (c.timestamp, i))
                .collect();
            index.insert(symbol.clone(), map);
        }

        Ok(Self {
            clock,
            symbols,
            series,
            index,
        })
    }

    pub fn clock(&self) -> &[DateTime<Utc>] {
        &self.clock
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// The candle for `symbol` at `timestamp`, or `None` if the symbol's
    /// table does not cover this tick.
    pub fn candle(&self, symbol: &str, timestamp: DateTime<Utc>) -> Option<&Candle> {
        let i = *self.index.get(symbol)?.get(&timestamp)?;
        self.series.get(symbol)?.get(i)
    }

    /// All of the symbol's own candles up to and including `timestamp`.
    /// This is the look-back source for strategy windows.
    pub fn history_to(&self, symbol: &str, timestamp: DateTime<Utc>) -> Option<&[Candle]> {
        let i = *self.index.get(symbol)?.get(&timestamp)?;
        self.series.get(symbol).map(|c| &c[..=i])
    }
}
