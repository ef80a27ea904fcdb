use chrono::{DateTime, Utc};
use core_types::YearMonth;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Account performance over one calendar month.
///
/// On the monthly chart a record is drawn as a candle with `entry` as open/low
/// and `exit` as close/high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub month: YearMonth,
    /// The month truncated to its first instant; the chart's x coordinate.
    pub month_start: DateTime<Utc>,
    /// Entry balance of the month's earliest trade.
    pub entry: Decimal,
    /// Exit balance of the month's latest trade.
    pub exit: Decimal,
    pub return_pct: Decimal,
}

/// The three headline indicators for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsSummary {
    pub market_returns_pct: Decimal,
    pub strategy_returns_pct: Decimal,
    pub strategy_vs_market_pct: Decimal,
    pub market_returns: String,
    pub strategy_returns: String,
    pub strategy_vs_market: String,
}

impl ReturnsSummary {
    pub fn new(market: Decimal, strategy: Decimal, delta: Decimal) -> Self {
        Self {
            market_returns_pct: market,
            strategy_returns_pct: strategy,
            strategy_vs_market_pct: delta,
            market_returns: format_pct(market),
            strategy_returns: format_pct(strategy),
            strategy_vs_market: format_pct(delta),
        }
    }
}

/// A single (time, value) sample of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub time: DateTime<Utc>,
    pub value: Decimal,
}

/// PnL samples for one trade type, sorted by entry time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlSeries {
    pub trade_type: String,
    pub points: Vec<TimePoint>,
}

/// One line of the scrollable trade table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    pub number: Option<u64>,
    pub entry_time: DateTime<Utc>,
    pub trade_type: String,
    pub exposure: Option<Decimal>,
    pub entry_balance: Decimal,
    pub exit_balance: Decimal,
    pub pnl: Decimal,
}

/// Everything the monthly overview panel needs.
///
/// `returns` is `None` for an empty selection so the indicators can render a
/// placeholder instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub monthly: Vec<MonthlyReturn>,
    pub returns: Option<ReturnsSummary>,
}

/// Renders a percentage with two decimals, rounding half away from zero.
pub fn format_pct(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}%")
}
