//! Landscape reboot tool.
//!
//! Schedules reboots of Landscape-managed computers one hour from now.
//!
//! # Usage
//!
//! ```text
//! landscape-reboot reboot-all
//! landscape-reboot reboot-needed
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LANDSCAPE_API_URI` | *(required)* | API endpoint, e.g. `https://landscape.canonical.com/api/` |
//! | `LANDSCAPE_API_KEY` | *(required)* | Access key id |
//! | `LANDSCAPE_API_SECRET` | *(required)* | Secret key |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod reboot;

use anyhow::{Context, Result};
use chrono::Utc;
use landscape_client::LandscapeClient;
use landscape_core::LandscapeConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::reboot::Operation;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let op_arg = std::env::args().nth(1).unwrap_or_default();
    let op: Operation = match op_arg.parse() {
        Ok(op) => op,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let config = LandscapeConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    let client = LandscapeClient::new(&config).context("failed to build HTTP client")?;

    info!(%op, endpoint = %client.endpoint(), "running operation");

    let mut stdout = std::io::stdout();
    reboot::run(&client, op, Utc::now(), &mut stdout).await
}
