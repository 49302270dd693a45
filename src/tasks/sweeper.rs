//! Expiry Sweeper
//!
//! Background task that periodically removes expired cache entries whether
//! or not they are ever read again.
//!
//! State machine: `Idle -> Sleeping -> Sweeping -> Sleeping -> ...`, ending
//! in `Stopped` once the cancellation token fires. Cancellation is observed
//! at sleep boundaries; a sweep already running is allowed to finish.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::Cache;
use crate::config::{DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_SWEEP_RETRY_SECS};
use crate::error::{CacheError, Result};

// == Sweeper Config ==
/// Timing of the sweep loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Sleep between regular sweeps
    pub interval: Duration,
    /// Shorter sleep after a failed sweep
    pub retry_interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            retry_interval: Duration::from_secs(DEFAULT_SWEEP_RETRY_SECS),
        }
    }
}

// == Sweeper State ==
/// Observable phase of the sweep loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    /// Spawned, loop not entered yet
    Idle,
    /// Waiting for the next sweep
    Sleeping,
    /// Removing expired entries
    Sweeping,
    /// Loop exited after cancellation
    Stopped,
}

// == Sweeper ==
/// Handle to a running sweep loop.
///
/// Dropping the handle does not stop the loop; call [`Sweeper::shutdown`]
/// or cancel the token from [`Sweeper::cancellation_token`].
#[derive(Debug)]
pub struct Sweeper {
    handle: JoinHandle<()>,
    token: CancellationToken,
    state: watch::Receiver<SweeperState>,
}

impl Sweeper {
    /// Spawns a sweeper that calls `cache.sweep_expired()` every interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(cache: Cache, config: SweeperConfig) -> Self {
        Self::spawn_with(config, move || {
            let cache = cache.clone();
            async move { cache.sweep_expired().await }
        })
    }

    /// Spawns a sweeper around an arbitrary sweep function.
    ///
    /// Each call to `sweep` and the future it returns run in their own task,
    /// so a panic in either is caught, logged, and followed by
    /// `config.retry_interval` instead of the regular interval.
    pub fn spawn_with<F, Fut>(config: SweeperConfig, sweep: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = usize> + Send + 'static,
    {
        let token = CancellationToken::new();
        let (state_tx, state) = watch::channel(SweeperState::Idle);

        let handle = tokio::spawn(run_loop(config, Arc::new(sweep), token.clone(), state_tx));

        Self {
            handle,
            token,
            state,
        }
    }

    /// Current phase of the loop.
    pub fn state(&self) -> SweeperState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SweeperState> {
        self.state.clone()
    }

    /// Token that stops the loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns true once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the loop and waits for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.token.cancel();
        self.handle
            .await
            .map_err(|err| CacheError::Internal(format!("sweeper task failed: {err}")))
    }
}

async fn run_loop<F, Fut>(
    config: SweeperConfig,
    sweep: Arc<F>,
    token: CancellationToken,
    state: watch::Sender<SweeperState>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = usize> + Send + 'static,
{
    info!(
        "Starting cache sweeper with interval of {:?} (retry {:?})",
        config.interval, config.retry_interval
    );

    let mut delay = config.interval;
    loop {
        state.send_replace(SweeperState::Sleeping);
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        state.send_replace(SweeperState::Sweeping);
        let job = Arc::clone(&sweep);
        match tokio::spawn(async move { job().await }).await {
            Ok(removed) => {
                debug!("Sweep cycle finished, {} entries removed", removed);
                delay = config.interval;
            }
            Err(err) => {
                error!("Cache sweep failed: {}", err);
                delay = config.retry_interval;
            }
        }
    }

    state.send_replace(SweeperState::Stopped);
    info!("Cache sweeper stopped");
}
