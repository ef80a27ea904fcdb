use chrono::{DateTime, Utc};
use core_types::{TradeRecord, YearMonth};
use serde::{Deserialize, Serialize};

/// The four dashboard selections that narrow the trade log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFilter {
    pub exchange: String,
    pub leverage: u32,
    /// Inclusive lower bound on entry time.
    pub start: DateTime<Utc>,
    /// Inclusive upper bound on entry time.
    pub end: DateTime<Utc>,
}

/// A filtered row: an owned copy of the trade plus its month bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub trade: TradeRecord,
    pub year_month: YearMonth,
}

/// The result of applying a [`TradeFilter`].
///
/// A view owns its rows, so it is independent of the table it came from and
/// of any other view. Rows keep the order of the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeView {
    rows: Vec<ViewRow>,
}

impl TradeFilter {
    pub fn new(
        exchange: impl Into<String>,
        leverage: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            leverage,
            start,
            end,
        }
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        trade.exchange == self.exchange
            && trade.leverage == self.leverage
            && trade.entry_time >= self.start
            && trade.entry_time <= self.end
    }

    /// Selects the matching trades from any source, be it the full table or a
    /// view produced by an earlier filter.
    pub fn apply<'a, I>(&self, trades: I) -> TradeView
    where
        I: IntoIterator<Item = &'a TradeRecord>,
    {
        let rows = trades
            .into_iter()
            .filter(|trade| self.matches(trade))
            .map(|trade| ViewRow {
                year_month: trade.year_month(),
                trade: trade.clone(),
            })
            .collect();
        TradeView { rows }
    }
}

impl TradeView {
    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn trades(&self) -> impl Iterator<Item = &TradeRecord> {
        self.rows.iter().map(|row| &row.trade)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows with the smallest and largest entry time. When several rows
    /// share a timestamp, the one appearing first wins for the earliest and
    /// the one appearing last wins for the latest.
    pub fn boundaries(&self) -> Option<(&TradeRecord, &TradeRecord)> {
        let earliest = self.trades().min_by_key(|t| t.entry_time)?;
        let latest = self.trades().max_by_key(|t| t.entry_time)?;
        Some((earliest, latest))
    }
}
