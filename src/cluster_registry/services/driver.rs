//! Supervised execution of a provider's discovery loop.
//!
//! A failing provider degrades the registry instead of ending the process:
//! the driver restarts discovery according to a [`ProviderRestartPolicy`],
//! publishes its state on a watch channel, and finally reports the outcome
//! through [`ProviderDriverHandle::join`]. Entries engaged before a failure
//! stay in the registry.

use crate::cluster_registry::ports::{
    ClusterProvider, DiscoveryProvider, EngagementListener, ProviderError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Restart policy for a failing discovery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRestartPolicy {
    /// A failure is final.
    Never,
    /// Restart after failures, doubling the delay each time.
    OnFailure {
        /// Restarts allowed before the provider is declared unavailable.
        max_restarts: u32,
        /// Delay before the first restart.
        initial_backoff: Duration,
        /// Upper bound for the delay.
        max_backoff: Duration,
    },
}

impl ProviderRestartPolicy {
    /// Returns the delay before restart number `restart_count + 1`, or
    /// `None` when no further restart is allowed.
    #[must_use]
    pub fn restart_delay(self, restart_count: u32) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::OnFailure {
                max_restarts,
                initial_backoff,
                max_backoff,
            } => {
                if restart_count >= max_restarts {
                    return None;
                }
                let factor = 2_u32.checked_pow(restart_count).unwrap_or(u32::MAX);
                Some(
                    initial_backoff
                        .checked_mul(factor)
                        .map_or(max_backoff, |delay| delay.min(max_backoff)),
                )
            }
        }
    }
}

/// Observable state of the provider driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    /// The provider has no discovery loop.
    Passive,
    /// Discovery attempt `attempt` (starting at 1) is running.
    Running {
        /// Attempt number.
        attempt: u32,
    },
    /// Attempt `attempt` failed; the next one starts after `retry_in`.
    Backoff {
        /// Failed attempt number.
        attempt: u32,
        /// Delay before the next attempt.
        retry_in: Duration,
        /// Rendered failure.
        last_error: String,
    },
    /// Discovery failed and will not be restarted.
    Unavailable {
        /// Rendered final failure.
        last_error: String,
    },
    /// Discovery returned normally without being cancelled.
    Completed,
    /// Discovery was cancelled.
    Cancelled,
}

impl ProviderStatus {
    /// Returns whether the driver will make no further attempts.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Passive | Self::Unavailable { .. } | Self::Completed | Self::Cancelled
        )
    }
}

/// Final outcome of a driver task.
#[derive(Debug, Clone)]
pub enum ProviderExit {
    /// No discovery loop was started.
    Passive,
    /// Discovery returned normally.
    Completed,
    /// Discovery was cancelled.
    Cancelled,
    /// Discovery failed and restarts were exhausted.
    Failed(ProviderError),
}

/// Errors raised while observing the driver itself.
#[derive(Debug, Error)]
pub enum ProviderDriverError {
    /// The supervisor task could not be joined.
    #[error("provider driver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handle to a spawned provider driver.
#[derive(Debug)]
pub struct ProviderDriverHandle {
    status: watch::Receiver<ProviderStatus>,
    cancel: CancellationToken,
    task: Option<JoinHandle<ProviderExit>>,
}

impl ProviderDriverHandle {
    /// Returns the current driver status.
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        self.status.borrow().clone()
    }

    /// Returns a receiver observing status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProviderStatus> {
        self.status.clone()
    }

    /// Requests cancellation of the discovery loop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the driver to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDriverError::Join`] when the supervisor task
    /// panicked or was aborted.
    pub async fn join(self) -> Result<ProviderExit, ProviderDriverError> {
        match self.task {
            Some(task) => Ok(task.await?),
            None => Ok(ProviderExit::Passive),
        }
    }
}

/// Launches provider discovery loops.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderDriver;

impl ProviderDriver {
    /// Starts driving `provider`, feeding discovered clusters to `listener`.
    ///
    /// Passive providers spawn nothing. Runnable providers are supervised on
    /// the current Tokio runtime until `cancel` fires, discovery completes,
    /// or `policy` gives up.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime with a runnable provider.
    #[must_use]
    pub fn spawn(
        provider: ClusterProvider,
        listener: Arc<dyn EngagementListener>,
        policy: ProviderRestartPolicy,
        cancel: CancellationToken,
    ) -> ProviderDriverHandle {
        match provider {
            ClusterProvider::Passive => {
                let (_, status) = watch::channel(ProviderStatus::Passive);
                tracing::info!("provider is passive; no discovery loop started");
                ProviderDriverHandle {
                    status,
                    cancel,
                    task: None,
                }
            }
            ClusterProvider::Runnable(runnable) => {
                let (status_tx, status) = watch::channel(ProviderStatus::Running { attempt: 1 });
                let task = tokio::spawn(supervise(
                    runnable,
                    listener,
                    policy,
                    cancel.clone(),
                    status_tx,
                ));
                ProviderDriverHandle {
                    status,
                    cancel,
                    task: Some(task),
                }
            }
        }
    }
}

async fn supervise(
    provider: Arc<dyn DiscoveryProvider>,
    listener: Arc<dyn EngagementListener>,
    policy: ProviderRestartPolicy,
    cancel: CancellationToken,
    status: watch::Sender<ProviderStatus>,
) -> ProviderExit {
    let mut attempt = 1_u32;
    loop {
        if cancel.is_cancelled() {
            return finish(&status, ProviderStatus::Cancelled, ProviderExit::Cancelled);
        }

        status.send_replace(ProviderStatus::Running { attempt });
        tracing::info!(attempt, "starting discovery provider");

        let outcome = run_attempt(&provider, &listener, &cancel).await;
        if cancel.is_cancelled() {
            tracing::info!(attempt, "discovery provider cancelled");
            return finish(&status, ProviderStatus::Cancelled, ProviderExit::Cancelled);
        }

        let error = match outcome {
            Ok(()) => {
                tracing::info!(attempt, "discovery provider completed");
                return finish(&status, ProviderStatus::Completed, ProviderExit::Completed);
            }
            Err(error) => error,
        };

        let restart_count = attempt.saturating_sub(1);
        let Some(retry_in) = policy.restart_delay(restart_count) else {
            tracing::error!(
                attempt,
                error = %error,
                "discovery provider failed; restarts exhausted, registry degraded"
            );
            return finish(
                &status,
                ProviderStatus::Unavailable {
                    last_error: error.to_string(),
                },
                ProviderExit::Failed(error),
            );
        };

        tracing::warn!(
            attempt,
            error = %error,
            retry_in_ms = u64::try_from(retry_in.as_millis()).unwrap_or(u64::MAX),
            "discovery provider failed; restarting"
        );
        status.send_replace(ProviderStatus::Backoff {
            attempt,
            retry_in,
            last_error: error.to_string(),
        });

        tokio::select! {
            () = cancel.cancelled() => {
                return finish(&status, ProviderStatus::Cancelled, ProviderExit::Cancelled);
            }
            () = tokio::time::sleep(retry_in) => {}
        }
        attempt = attempt.saturating_add(1);
    }
}

/// Runs one discovery attempt in its own task so a panic is contained.
async fn run_attempt(
    provider: &Arc<dyn DiscoveryProvider>,
    listener: &Arc<dyn EngagementListener>,
    cancel: &CancellationToken,
) -> Result<(), ProviderError> {
    let provider = Arc::clone(provider);
    let listener = Arc::clone(listener);
    let attempt_cancel = cancel.child_token();
    // Tasks the provider left behind from this attempt are cancelled with it.
    let _attempt_scope = attempt_cancel.clone().drop_guard();
    let task =
        tokio::spawn(async move { provider.start(attempt_cancel, listener).await });

    match task.await {
        Ok(result) => result,
        Err(err) if err.is_panic() => Err(ProviderError::Panicked(err.to_string())),
        Err(err) => Err(ProviderError::discovery(err)),
    }
}

fn finish(
    status: &watch::Sender<ProviderStatus>,
    final_status: ProviderStatus,
    exit: ProviderExit,
) -> ProviderExit {
    status.send_replace(final_status);
    exit
}
