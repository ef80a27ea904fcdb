//! # Dashboard Dataset Crate
//!
//! This crate owns the one-time load of the backtest trade log. It is the
//! system's only source of data.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** Encapsulates the CSV format and its column names. The rest
//!   of the application only ever sees `core_types::TradeRecord`.
//! - **Fail Fast:** The header is validated before any row is parsed. A log without
//!   the expected columns never becomes a `TradeTable`.
//! - **Immutable & Shared:** `TradeTable` is an `Arc`-backed, read-only handle that can
//!   be cloned into every request without locking.
//!
//! ## Public API
//!
//! - `load_csv`: Reads and validates the trade log from disk.
//! - `TradeTable`: The shared read-only handle, plus selector helpers
//!   (`exchanges`, `leverages`, `date_bounds`).
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod loader;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use loader::{REQUIRED_COLUMNS, load_csv, load_from_reader};
pub use table::{DateBounds, TradeTable};
