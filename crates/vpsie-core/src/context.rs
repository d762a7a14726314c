//! Per-call cancellation and deadlines.
//!
//! A [`RequestContext`] travels with every call into the core. It carries an
//! optional deadline and an optional cancellation signal; `execute` races the
//! network exchange against both and gives up as soon as either fires.

use std::future::pending;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

/// Cancellation and deadline scope for a single call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// A context that never cancels and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Limit the call to `timeout` from now.
    ///
    /// An earlier deadline that is already set is kept. A timeout too large
    /// to represent as an instant leaves the context without a deadline.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Abort the call once `deadline` passes.
    ///
    /// An earlier deadline that is already set is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Tie the context to a [`CancelHandle`].
    #[must_use]
    pub fn with_cancellation(mut self, handle: &CancelHandle) -> Self {
        self.cancel = Some(handle.sender.subscribe());
        self
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the associated handle has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves when the context is cancelled; never resolves otherwise.
    pub(crate) async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Handle dropped without cancelling.
            pending::<()>().await;
        }
    }

    /// Resolves when the deadline passes; never resolves without one.
    pub(crate) async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            }
            None => pending().await,
        }
    }
}

/// Owner side of a cancellation signal.
///
/// Cloning the handle shares the same signal.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Create a new, uncancelled handle.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Signal cancellation to every context derived from this handle.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// A fresh context bound to this handle.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::background().with_cancellation(self)
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
