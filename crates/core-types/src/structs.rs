use crate::month::YearMonth;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One closed trade from the backtest log.
///
/// Records are produced once by the dataset loader and never mutated
/// afterwards; every derived view holds its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Sequence number of the trade in the backtest, when the log carries one.
    pub number: Option<u64>,
    pub exchange: String,
    /// The margin multiplier the backtest ran with (1, 2, 5, ...).
    pub leverage: u32,
    pub entry_time: DateTime<Utc>,
    /// Categorical label such as "Long" or "Short".
    pub trade_type: String,
    pub exposure: Option<Decimal>,
    /// Account balance immediately before the trade.
    pub entry_balance: Decimal,
    /// Account balance immediately after the trade.
    pub exit_balance: Decimal,
    /// Profit and loss, net of fees.
    pub pnl: Decimal,
    pub btc_price: Decimal,
}

impl TradeRecord {
    /// The calendar month this trade was entered in.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_datetime(&self.entry_time)
    }
}
