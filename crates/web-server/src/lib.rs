use axum::{Router, routing::get};
use configuration::Dashboard;
use dataset::TradeTable;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod telemetry;

/// The shared application state that all handlers can access.
///
/// The table is read-only, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub table: TradeTable,
    pub defaults: Dashboard,
}

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/options", get(handlers::get_options))
        .route("/api/date-range", get(handlers::get_date_range))
        .route("/api/overview", get(handlers::get_overview))
        .route("/api/pnl-types", get(handlers::get_pnl_types))
        .route("/api/btc-price", get(handlers::get_btc_price))
        .route("/api/balance", get(handlers::get_balance))
        .route("/api/trades", get(handlers::get_trades))
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the dashboard API until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    // Tracing is already initialized by the caller; installing a second
    // subscriber here would conflict with it.
    let trades = state.table.len();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, trades, "Web server started and listening.");
    axum::serve(listener, app).await?;

    Ok(())
}
