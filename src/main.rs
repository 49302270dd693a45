//! Memo Cache - host process
//!
//! Owns one cache instance for the lifetime of the process: created at
//! startup, swept in the background, torn down on shutdown.

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{Cache, Config, Sweeper};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache instance
/// 4. Start the background expiry sweeper
/// 5. Wait for SIGINT/SIGTERM, then stop the sweeper and report final stats
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Memo Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, long_ttl={}s, short_ttl={}s, sweep_interval={}s, sweep_retry_interval={}s",
        config.default_ttl,
        config.long_ttl,
        config.short_ttl,
        config.sweep_interval,
        config.sweep_retry_interval
    );

    let cache = Cache::new();
    let sweeper = Sweeper::spawn(cache.clone(), config.sweeper());
    info!("Background sweeper started");

    shutdown_signal().await?;

    sweeper.shutdown().await?;
    let report = cache.report().await;
    info!("Final cache stats: {}", serde_json::to_string(&report)?);

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}
