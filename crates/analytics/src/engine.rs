use crate::error::AnalyticsError;
use crate::filter::TradeView;
use crate::report::{
    DashboardOverview, MonthlyReturn, PnlSeries, ReturnsSummary, TimePoint, TradeRow,
};
use core_types::{TradeRecord, YearMonth};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A stateless calculator for deriving dashboard series from a filtered view.
///
/// Every method is a pure function of its input view; nothing is cached
/// between calls.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the monthly chart and the three indicators in one pass.
    ///
    /// An empty view yields no months and `returns: None`; any other failure
    /// is propagated.
    pub fn overview(&self, view: &TradeView) -> Result<DashboardOverview, AnalyticsError> {
        let monthly = self.monthly_returns(view)?;
        let returns = if view.is_empty() {
            None
        } else {
            Some(self.returns_summary(view)?)
        };
        Ok(DashboardOverview { monthly, returns })
    }

    /// Groups the view by month and measures each month from the entry balance
    /// of its earliest trade to the exit balance of its latest trade.
    ///
    /// Months without trades are absent from the output, which is sorted by month.
    pub fn monthly_returns(&self, view: &TradeView) -> Result<Vec<MonthlyReturn>, AnalyticsError> {
        let mut months: BTreeMap<YearMonth, Vec<&TradeRecord>> = BTreeMap::new();
        for row in view.rows() {
            months.entry(row.year_month).or_default().push(&row.trade);
        }

        months
            .into_iter()
            .map(|(month, trades)| -> Result<MonthlyReturn, AnalyticsError> {
                // Ties on entry time resolve to row order: first for the opening
                // trade, last for the closing one.
                let (first, last) = trades
                    .iter()
                    .min_by_key(|t| t.entry_time)
                    .zip(trades.iter().max_by_key(|t| t.entry_time))
                    .ok_or_else(|| AnalyticsError::NotEnoughData(format!("month {month}")))?;

                let entry = first.entry_balance;
                let exit = last.exit_balance;
                let return_pct = percentage_change(entry, exit, &format!("monthly return {month}"))?;

                Ok(MonthlyReturn {
                    month,
                    month_start: month.start(),
                    entry,
                    exit,
                    return_pct,
                })
            })
            .collect()
    }

    /// Percentage change in BTC price from the earliest to the latest trade.
    pub fn market_returns(&self, view: &TradeView) -> Result<Decimal, AnalyticsError> {
        let (earliest, latest) = view
            .boundaries()
            .ok_or_else(|| AnalyticsError::NotEnoughData("market returns".to_string()))?;
        percentage_change(earliest.btc_price, latest.btc_price, "market returns")
    }

    /// Account growth from the entry balance of the earliest trade to the exit
    /// balance of the latest one.
    pub fn strategy_returns(&self, view: &TradeView) -> Result<Decimal, AnalyticsError> {
        let (earliest, latest) = view
            .boundaries()
            .ok_or_else(|| AnalyticsError::NotEnoughData("strategy returns".to_string()))?;
        percentage_change(earliest.entry_balance, latest.exit_balance, "strategy returns")
    }

    pub fn strategy_vs_market(&self, strategy: Decimal, market: Decimal) -> Decimal {
        strategy - market
    }

    pub fn returns_summary(&self, view: &TradeView) -> Result<ReturnsSummary, AnalyticsError> {
        let market = self.market_returns(view)?;
        let strategy = self.strategy_returns(view)?;
        let delta = self.strategy_vs_market(strategy, market);
        Ok(ReturnsSummary::new(market, strategy, delta))
    }

    /// One PnL series per trade type, ordered by trade type name. Each series
    /// is sorted by entry time; trades sharing a timestamp keep view order.
    pub fn pnl_by_trade_type(&self, view: &TradeView) -> Vec<PnlSeries> {
        let mut groups: BTreeMap<&str, Vec<TimePoint>> = BTreeMap::new();
        for trade in view.trades() {
            groups.entry(trade.trade_type.as_str()).or_default().push(TimePoint {
                time: trade.entry_time,
                value: trade.pnl,
            });
        }

        groups
            .into_iter()
            .map(|(trade_type, mut points)| {
                points.sort_by_key(|p| p.time);
                PnlSeries {
                    trade_type: trade_type.to_string(),
                    points,
                }
            })
            .collect()
    }

    pub fn price_series(&self, view: &TradeView) -> Vec<TimePoint> {
        view.trades()
            .map(|t| TimePoint {
                time: t.entry_time,
                value: t.btc_price,
            })
            .collect()
    }

    pub fn balance_series(&self, view: &TradeView) -> Vec<TimePoint> {
        view.trades()
            .map(|t| TimePoint {
                time: t.entry_time,
                value: t.exit_balance,
            })
            .collect()
    }

    /// Projects the view onto the columns shown in the trade table.
    pub fn trade_rows(&self, view: &TradeView) -> Vec<TradeRow> {
        view.trades()
            .map(|t| TradeRow {
                number: t.number,
                entry_time: t.entry_time,
                trade_type: t.trade_type.clone(),
                exposure: t.exposure,
                entry_balance: t.entry_balance,
                exit_balance: t.exit_balance,
                pnl: t.pnl,
            })
            .collect()
    }
}

/// `(to / from) * 100 - 100`, refusing a zero denominator.
fn percentage_change(from: Decimal, to: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    if from.is_zero() {
        return Err(AnalyticsError::DivisionByZero(metric.to_string()));
    }
    to.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(from))
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE_HUNDRED))
        .ok_or_else(|| AnalyticsError::Overflow(metric.to_string()))
}
