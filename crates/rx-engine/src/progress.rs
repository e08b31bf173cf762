//! Progress narrative and cancellation.
//!
//! Pipelines narrate what they do (row counts before and after each filter)
//! through a [`ProgressSink`]. Reporting is fire-and-forget: a failing sink
//! never fails the pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rx_model::{ReorderError, Stage};
use thiserror::Error;

/// Failure of a progress sink. Never propagated out of a pipeline.
#[derive(Debug, Error)]
#[error("progress sink failed: {message}")]
pub struct ProgressError {
    pub message: String,
}

impl ProgressError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receiver of progress messages.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str) -> Result<(), ProgressError>;
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) -> Result<(), ProgressError> {
        self(message);
        Ok(())
    }
}

/// Sink that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _message: &str) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Sink that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, message: &str) -> Result<(), ProgressError> {
        let mut messages = self
            .messages
            .lock()
            .map_err(|_| ProgressError::new("recording sink poisoned"))?;
        messages.push(message.to_string());
        Ok(())
    }
}

/// Handle the pipelines report through.
///
/// Every message is also emitted as a tracing event, so a run is fully
/// narrated in the log even without a sink.
#[derive(Clone, Copy)]
pub struct Progress<'a> {
    sink: &'a dyn ProgressSink,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self { sink }
    }

    /// A handle that reports to tracing only.
    pub fn silent() -> Progress<'static> {
        Progress {
            sink: &NullProgress,
        }
    }

    pub fn report(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "rx_engine::progress", "{message}");
        if let Err(error) = self.sink.report(message) {
            tracing::debug!(%error, "progress sink error ignored");
        }
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// Shared flag a caller sets to stop a run at the next stage boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fails with [`ReorderError::Cancelled`] if cancellation was requested
    /// before `stage`.
    pub fn check(&self, stage: Stage) -> Result<(), ReorderError> {
        if self.is_cancelled() {
            tracing::warn!(stage = %stage, "run cancelled");
            Err(ReorderError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}
