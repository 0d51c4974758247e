//! Lifecycle Module
//!
//! Shutdown coordination for a background task: a cancellation token plus a
//! join handle, with the `Running -> Closing -> Closed` state machine.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const RUNNING: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// Observable state of a background task owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Task is running
    Running,
    /// Cancellation was requested, waiting for the task to return
    Closing,
    /// Task has returned
    Closed,
}

// == Lifecycle ==
/// Owns a background task and stops it on request.
///
/// Dropping the lifecycle cancels the task without waiting for it.
#[derive(Debug)]
pub struct Lifecycle {
    token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
    state: AtomicU8,
}

impl Lifecycle {
    // == Start ==
    /// Spawns the task with a fresh cancellation token.
    pub fn start<F>(spawn: F) -> Self
    where
        F: FnOnce(CancellationToken) -> JoinHandle<()>,
    {
        let token = CancellationToken::new();
        let handle = spawn(token.clone());
        Self {
            token,
            handle: Mutex::new(Some(handle)),
            state: AtomicU8::new(RUNNING),
        }
    }

    /// Current state, readable without blocking.
    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => LifecycleState::Running,
            CLOSING => LifecycleState::Closing,
            _ => LifecycleState::Closed,
        }
    }

    // == Shutdown ==
    /// Cancels the task and waits until it has returned.
    ///
    /// Idempotent. Concurrent callers all return after the task is gone.
    pub async fn shutdown(&self) {
        let mut handle = self.handle.lock().await;
        let Some(task) = handle.take() else {
            return;
        };

        self.state.store(CLOSING, Ordering::Release);
        self.token.cancel();

        if let Err(err) = task.await {
            if err.is_panic() {
                warn!("Background task panicked before shutdown: {}", err);
            }
        }
        self.state.store(CLOSED, Ordering::Release);
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
