#![forbid(unsafe_code)]

//! Selectable background tasks (the self-pipe trick).
//!
//! A [`SelectableTask`] runs a blocking operation on a detached worker
//! thread and exposes an anonymous pipe whose read end becomes readable
//! exactly once, when the operation has finished (success, failure, or
//! panic). Because completion is an fd, a foreground thread can wait on
//! it with the same `poll(2)` call it uses for keyboard input, which is
//! what the cancellable-dialog bridge in `shoji-widgets` does.
//!
//! Cancellation is cooperative: dropping the task abandons the worker,
//! which keeps running to completion in the background; its result is
//! discarded when the pipe's read end is gone. Resource cleanup inside
//! the operation is therefore the operation's own responsibility.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};
use std::thread;

use thiserror::Error;
use tracing::debug;

/// Why a background operation did not produce a value.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The operation returned an error.
    #[error("background task failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The worker thread panicked; the payload is preserved as text.
    #[error("background task panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// Wrap any error as a task failure.
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TaskError::Failed(err.into())
    }

    /// Build a failure from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        TaskError::Failed(msg.into().into())
    }
}

/// The three ways a cancellable operation can end.
///
/// "The user gave up" and "the operation broke" are distinct outcomes so
/// callers can react differently without matching on error types.
#[derive(Debug)]
pub enum TaskOutcome<T> {
    /// The operation finished and produced a value.
    Completed(T),
    /// The operation finished with an error (or panicked).
    Failed(TaskError),
    /// The operator pressed a cancel key; the worker was abandoned.
    Cancelled,
}

impl<T> TaskOutcome<T> {
    /// True if the operator cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, TaskOutcome::Cancelled)
    }
}

/// A background operation with an fd-selectable completion signal.
pub struct SelectableTask<T> {
    slot: Arc<Mutex<Option<Result<T, TaskError>>>>,
    signal: File,
}

impl<T: Send + 'static> SelectableTask<T> {
    /// Spawn `op` on a detached worker thread.
    ///
    /// The worker stores its result (or captured panic) in the shared
    /// slot, then writes one sentinel byte to the pipe and closes the
    /// write end, so completion is signaled exactly once on every path.
    pub fn spawn<F>(op: F) -> io::Result<Self>
    where
        F: FnOnce() -> Result<T, TaskError> + Send + 'static,
    {
        let (signal_rx, signal_tx) = nix::unistd::pipe().map_err(io::Error::from)?;
        let slot = Arc::new(Mutex::new(None));

        let worker_slot = Arc::clone(&slot);
        let mut signal_tx = File::from(signal_tx);
        thread::Builder::new()
            .name("shoji-task".into())
            .spawn(move || {
                let result = match catch_unwind(AssertUnwindSafe(op)) {
                    Ok(result) => result,
                    Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
                };
                if let Ok(mut guard) = worker_slot.lock() {
                    *guard = Some(result);
                }
                // A failed sentinel write means the foreground already
                // abandoned us; the result is discarded either way.
                if signal_tx.write_all(b"\n").is_err() {
                    debug!("completion signal dropped; task was abandoned");
                }
            })?;

        Ok(Self {
            slot,
            signal: File::from(signal_rx),
        })
    }

    /// The read end of the completion pipe, for `poll(2)` registration.
    #[must_use]
    pub fn signal_fd(&self) -> BorrowedFd<'_> {
        self.signal.as_fd()
    }

    /// Consume the completion signal and take the worker's result.
    ///
    /// Blocks on the pipe until the worker has signaled; returns
    /// immediately when called after a readiness wait reported the
    /// signal fd ready. The sentinel is read exactly once.
    pub fn join(self) -> Result<T, TaskError> {
        let Self { slot, mut signal } = self;
        let mut sentinel = [0u8; 1];
        let _ = signal.read(&mut sentinel);
        match slot.lock() {
            Ok(mut guard) => guard
                .take()
                .unwrap_or_else(|| Err(TaskError::message("worker finished without a result"))),
            Err(_) => Err(TaskError::message("worker poisoned the result slot")),
        }
    }
}

impl<T> std::fmt::Debug for SelectableTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectableTask").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}
