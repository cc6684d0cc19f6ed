//! Server configuration
//!
//! Command-line flags only; the defaults give the fixed layout
//! (`./fintrack.db`, port 8000). `RUST_LOG` is the one environment
//! variable read, and only for the log filter.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_DB_PATH: &str = "fintrack.db";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

const DEFAULT_LOG_FILTER: &str = "fintrack=info,fintrack_server=info,tower_http=info";

/// Fintrack expense API server
#[derive(Parser, Debug, Clone)]
#[command(name = "fintrack-server", version)]
pub struct ServerConfig {
    /// Bind address
    #[arg(short, long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database file
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.bind, self.port))
    }
}

/// Console logging; `RUST_LOG` overrides the default filter
pub fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}
