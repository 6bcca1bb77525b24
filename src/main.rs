//! LFU Cache - interactive owner process
//!
//! Builds the single shared cache store and drives it from stdin.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lfu_cache::shell::{self, Command};
use lfu_cache::{CacheStore, Config};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache store and register logging observers
/// 4. Read commands from stdin until `quit` or end of input
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lfu_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!("Configuration loaded: capacity={}", config.capacity);

    let store = Arc::new(CacheStore::from_config(&config).context("invalid CACHE_CAPACITY")?);
    store.on_item_removed(|key| info!(key, "item removed"));
    store.on_item_updated(|key| info!(key, "item updated"));
    info!("Cache store initialized");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match shell::execute(&store, command) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => writeln!(stdout, "{}", output).context("failed to write to stdout")?,
            Err(e) => error!("{}", e),
        }
    }

    info!("Shutdown complete");
    Ok(())
}
