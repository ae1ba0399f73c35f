//! eventdesk server binary
//!
//! Reads configuration from the environment (see [`eventdesk_server::config`])
//! and serves the API. Log verbosity follows `RUST_LOG`.

use eventdesk_server::{start_server, Config};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;
    start_server(config).await
}
