use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Dashboard, Data, LogFormat, Logging, Server};

/// Prefix for environment overrides, e.g. `DASHBOARD__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the application configuration from `path`.
///
/// The file is optional; every field has a default. Environment variables
/// prefixed with `DASHBOARD__` take precedence over the file. The result is
/// validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Rejects settings the application cannot start with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.path must not be empty".to_string(),
        ));
    }
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    if config.dashboard.default_leverage == 0 {
        return Err(ConfigError::ValidationError(
            "dashboard.default_leverage must be at least 1".to_string(),
        ));
    }
    Ok(())
}
