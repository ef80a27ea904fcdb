use anyhow::Context;
use web_server::AppState;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration and the trade log, then hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = configuration::load_config().context("Failed to load configuration")?;

    // Same subscriber as the CLI, so `logging.format` and `logging.directory` apply here too.
    let _log_guard = web_server::telemetry::init_tracing(&config.logging)?;

    let table = dataset::load_csv(&config.data.path)
        .with_context(|| format!("Failed to load trade log {}", config.data.path.display()))?;

    let state = AppState {
        table,
        defaults: config.dashboard.clone(),
    };
    web_server::run_server(config.server.socket_addr(), state).await
}
