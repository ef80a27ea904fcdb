//! # Dashboard Analytics Engine
//!
//! This crate turns the flat trade log into the series shown on the dashboard:
//! monthly returns, market and strategy returns, PnL by trade type, and the
//! price and balance curves.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   HTTP or configuration. It depends only on `core-types` (Layer 0).
//! - **Filter, then Aggregate:** `TradeFilter` narrows any trade source into an owned
//!   `TradeView`. The `AnalyticsEngine` only ever reads views, never the shared table.
//! - **Stateless Calculation:** Every aggregator is a pure function of its view.
//!   Empty or degenerate input is reported through `AnalyticsError`, never a panic.
//!
//! ## Public API
//!
//! - `TradeFilter` / `TradeView`: The data filter and its result.
//! - `AnalyticsEngine`: The aggregators.
//! - `report`: The output records (`MonthlyReturn`, `ReturnsSummary`, `PnlSeries`, ...).
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{TradeFilter, TradeView, ViewRow};
pub use report::{
    DashboardOverview, MonthlyReturn, PnlSeries, ReturnsSummary, TimePoint, TradeRow, format_pct,
};
