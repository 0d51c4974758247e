//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Something the reaper can sweep.
pub trait Sweep: Send + Sync + 'static {
    /// Removes every expired entry and returns how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Spawns a background task that sweeps `target` every `interval`.
///
/// The first sweep happens one full interval after spawning. The task exits
/// as soon as `token` is cancelled, including while it waits for a tick.
///
/// # Arguments
/// * `target` - shared reference to the structure being swept
/// * `interval` - time between sweeps, must be non-zero
/// * `token` - cancellation signal for shutdown
///
/// # Returns
/// A JoinHandle for the spawned task, awaited during shutdown.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let handle = spawn_reaper(shared.clone(), Duration::from_secs(1), token.clone());
/// // Later, during shutdown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_reaper<S: Sweep>(
    target: Arc<S>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL reaper with interval of {:?}", interval);

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = target.purge_expired();

                    if removed > 0 {
                        info!("TTL reaper: removed {} expired entries", removed);
                    } else {
                        debug!("TTL reaper: no expired entries found");
                    }
                }
            }
        }

        info!("TTL reaper stopped");
    })
}
