use crate::{AppState, error::AppError};
use analytics::{
    AnalyticsEngine, DashboardOverview, PnlSeries, TimePoint, TradeFilter, TradeRow, TradeView,
};
use axum::{
    Json,
    extract::{FromRequestParts, Query, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use dataset::DateBounds;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `Query`, but a malformed query string becomes an `AppError` so the
/// client still gets a JSON error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// The dashboard's selector state. Every field is optional; gaps are filled
/// from the configured defaults and from the full date range.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub exchange: Option<String>,
    pub leverage: Option<u32>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (start of day).
    pub start: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (end of day).
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub exchange: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub exchanges: Vec<String>,
    pub leverages: Vec<u32>,
    pub default_exchange: String,
    pub default_leverage: u32,
    pub date_bounds: Option<DateBounds>,
}

impl SelectionQuery {
    /// Turns the query into a concrete filter. A missing bound leaves that
    /// side of the window open, which covers the exchange's whole history.
    pub fn to_filter(&self, state: &AppState) -> Result<TradeFilter, AppError> {
        let exchange = self
            .exchange
            .clone()
            .unwrap_or_else(|| state.defaults.default_exchange.clone());
        let leverage = self.leverage.unwrap_or(state.defaults.default_leverage);
        let start = match &self.start {
            Some(raw) => parse_bound(raw, Bound::Start)?,
            None => DateTime::<Utc>::MIN_UTC,
        };
        let end = match &self.end {
            Some(raw) => parse_bound(raw, Bound::End)?,
            None => DateTime::<Utc>::MAX_UTC,
        };
        Ok(TradeFilter::new(exchange, leverage, start, end))
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date '{raw}'")))?;
    let ts = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    ts.map(|ts| ts.and_utc())
        .ok_or_else(|| AppError::BadRequest(format!("invalid date '{raw}'")))
}

/// Filters the shared table for one request. Nothing is cached between requests.
fn select(state: &AppState, query: &SelectionQuery) -> Result<TradeView, AppError> {
    let filter = query.to_filter(state)?;
    let view = filter.apply(&state.table);
    if view.is_empty() {
        tracing::debug!(
            ?filter,
            known_exchange = state.table.contains_exchange(&filter.exchange),
            "Selection matched no trades."
        );
    }
    Ok(view)
}

/// # GET /api/options
/// Values for the exchange and leverage selectors.
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        exchanges: state.table.exchanges(),
        leverages: state.table.leverages(),
        default_exchange: state.defaults.default_exchange.clone(),
        default_leverage: state.defaults.default_leverage,
        date_bounds: state.table.date_bounds(None),
    })
}

/// # GET /api/date-range
/// The date picker's range for the selected exchange.
pub async fn get_date_range(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<Json<DateBounds>, AppError> {
    let exchange = query
        .exchange
        .unwrap_or_else(|| state.defaults.default_exchange.clone());
    state
        .table
        .date_bounds(Some(&exchange))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No trades for exchange '{exchange}'")))
}

/// # GET /api/overview
/// Monthly returns plus the market, strategy and delta indicators.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> Result<Json<DashboardOverview>, AppError> {
    let view = select(&state, &query)?;
    let overview = AnalyticsEngine::new().overview(&view)?;
    Ok(Json(overview))
}

/// # GET /api/pnl-types
pub async fn get_pnl_types(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> Result<Json<Vec<PnlSeries>>, AppError> {
    let view = select(&state, &query)?;
    Ok(Json(AnalyticsEngine::new().pnl_by_trade_type(&view)))
}

/// # GET /api/btc-price
pub async fn get_btc_price(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> Result<Json<Vec<TimePoint>>, AppError> {
    let view = select(&state, &query)?;
    Ok(Json(AnalyticsEngine::new().price_series(&view)))
}

/// # GET /api/balance
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> Result<Json<Vec<TimePoint>>, AppError> {
    let view = select(&state, &query)?;
    Ok(Json(AnalyticsEngine::new().balance_series(&view)))
}

/// # GET /api/trades
/// The rows backing the scrollable trade table.
pub async fn get_trades(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> Result<Json<Vec<TradeRow>>, AppError> {
    let view = select(&state, &query)?;
    Ok(Json(AnalyticsEngine::new().trade_rows(&view)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only_bounds_cover_the_whole_day() {
        let start = parse_bound("2020-01-31", Bound::Start).unwrap();
        let end = parse_bound("2020-01-31", Bound::End).unwrap();

        assert_eq!(start.to_rfc3339(), "2020-01-31T00:00:00+00:00");
        assert!(end > "2020-01-31T23:59:59Z".parse::<DateTime<Utc>>().unwrap());
        assert!(end < "2020-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn rfc3339_bounds_are_taken_verbatim() {
        let ts = parse_bound("2020-01-31T12:00:00+01:00", Bound::End).unwrap();
        assert_eq!(ts.to_rfc3339(), "2020-01-31T11:00:00+00:00");
    }

    #[test]
    fn garbage_bound_is_a_bad_request() {
        assert!(matches!(
            parse_bound("Jan 20", Bound::Start),
            Err(AppError::BadRequest(_))
        ));
    }
}
