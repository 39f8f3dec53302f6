//! Observable background tasks
//!
//! [`PendingTask`] runs a future on the tokio runtime and exposes its progress
//! as a [`TaskState`] that callers can poll or await. Dropping the handle (or
//! calling [`PendingTask::cancel`]) aborts the work so that a torn-down
//! consumer never receives a stale result.
//!
//! [`SingleFlight`] rejects a second in-flight operation under the same key,
//! which closes the double-submit window of click-driven workflows.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Lifecycle of a background task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState<T> {
    Pending,
    Resolved(T),
    Rejected(String),
    Cancelled,
}

impl<T> TaskState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TaskState::Resolved(_))
    }
}

/// Handle to a spawned task whose outcome is observable
pub struct PendingTask<T> {
    label: String,
    state: Arc<watch::Sender<TaskState<T>>>,
    handle: JoinHandle<()>,
}

impl<T> PendingTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns `future` on the current runtime
    pub fn spawn<F, E>(label: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let label = label.into();
        let (tx, _rx) = watch::channel(TaskState::Pending);
        let state = Arc::new(tx);

        let task_state = Arc::clone(&state);
        let task_label = label.clone();
        let handle = tokio::spawn(async move {
            let outcome = match future.await {
                Ok(value) => {
                    debug!(task = %task_label, "Task resolved");
                    TaskState::Resolved(value)
                }
                Err(err) => {
                    warn!(task = %task_label, error = %err, "Task rejected");
                    TaskState::Rejected(err.to_string())
                }
            };
            task_state.send_if_modified(|current| {
                if current.is_pending() {
                    *current = outcome;
                    true
                } else {
                    false
                }
            });
        });

        Self {
            label,
            state,
            handle,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns a snapshot of the current state
    pub fn state(&self) -> TaskState<T> {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Aborts the task; a task that already finished keeps its outcome
    pub fn cancel(&self) {
        self.handle.abort();
        let cancelled = self.state.send_if_modified(|current| {
            if current.is_pending() {
                *current = TaskState::Cancelled;
                true
            } else {
                false
            }
        });
        if cancelled {
            debug!(task = %self.label, "Task cancelled");
        }
    }

    /// Waits until the task leaves the pending state
    pub async fn wait(&self) -> TaskState<T> {
        let mut rx = self.state.subscribe();
        // The watch::Ref must be released before `rx` goes out of scope
        let settled = rx.wait_for(|state| !state.is_pending()).await.map(|state| state.clone());
        settled.unwrap_or(TaskState::Cancelled)
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl<T> fmt::Debug for PendingTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask")
            .field("label", &self.label)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

/// Guards against concurrent duplicate operations
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` until the returned guard is dropped
    ///
    /// Fails with [`CoreError::Busy`] while another holder owns the key.
    pub fn acquire(&self, key: impl Into<String>) -> Result<FlightGuard, CoreError> {
        let key = key.into();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        if !in_flight.insert(key.clone()) {
            return Err(CoreError::busy(key));
        }
        Ok(FlightGuard {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(key)
    }
}

/// Releases its [`SingleFlight`] key on drop
#[derive(Debug)]
pub struct FlightGuard {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl FlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&self.key);
    }
}
