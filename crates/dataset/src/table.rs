use chrono::{DateTime, Utc};
use core_types::TradeRecord;
use serde::Serialize;
use std::sync::Arc;

/// The read-only trade log shared by every request.
///
/// Cloning is cheap: all clones point at the same rows. There is no way to
/// mutate the rows once the table is built.
#[derive(Debug, Clone)]
pub struct TradeTable {
    trades: Arc<[TradeRecord]>,
}

/// Earliest and latest entry time within some slice of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TradeTable {
    pub fn new(trades: Vec<TradeRecord>) -> Self {
        Self {
            trades: trades.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.trades.iter()
    }

    pub fn as_slice(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Distinct exchanges, in the order they first appear.
    pub fn exchanges(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for trade in self.iter() {
            if !seen.iter().any(|e| *e == trade.exchange) {
                seen.push(trade.exchange.clone());
            }
        }
        seen
    }

    /// Distinct leverages, in the order they first appear.
    pub fn leverages(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        for trade in self.iter() {
            if !seen.contains(&trade.leverage) {
                seen.push(trade.leverage);
            }
        }
        seen
    }

    pub fn contains_exchange(&self, exchange: &str) -> bool {
        self.iter().any(|t| t.exchange == exchange)
    }

    /// The entry time range covered by `exchange`, or by the whole log when
    /// `exchange` is `None`. Returns `None` if no row matches.
    pub fn date_bounds(&self, exchange: Option<&str>) -> Option<DateBounds> {
        self.iter()
            .filter(|t| exchange.is_none_or(|e| t.exchange == e))
            .map(|t| t.entry_time)
            .fold(None, |bounds, ts| match bounds {
                None => Some(DateBounds { start: ts, end: ts }),
                Some(DateBounds { start, end }) => Some(DateBounds {
                    start: start.min(ts),
                    end: end.max(ts),
                }),
            })
    }
}

impl<'a> IntoIterator for &'a TradeTable {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
