use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: Data,
    pub server: Server,
    pub dashboard: Dashboard,
    pub logging: Logging,
}

/// Where the trade log lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Path to the CSV trade log, read once at startup.
    pub path: PathBuf,
}

/// Contains parameters for the HTTP API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: IpAddr,
    pub port: u16,
}

/// The selection shown before the user picks anything.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub default_exchange: String,
    pub default_leverage: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// An `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

impl Server {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// --- Default Implementations ---
// This allows a user to omit any section (or the whole file)
// and still have it work with sensible defaults.

impl Default for Data {
    fn default() -> Self {
        Self {
            path: PathBuf::from("aggr.csv"),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            default_exchange: "Bitmex".to_string(),
            default_leverage: 1,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}
