//! Dispatcher support types

use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative cancellation signal shared between a caller and the calls
/// governed by it.
///
/// Clones observe the same signal. Once cancelled, a signal stays cancelled;
/// in-flight calls racing it resolve to a `Cancelled` error, distinguishable
/// from an elapsed deadline.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Create a new, un-cancelled signal
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Trigger cancellation for every clone of this signal
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Whether cancellation has been triggered
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once cancellation is triggered; immediately if it already was
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw view of a non-success response, handed to caller-supplied error
/// mappers on POST/PUT.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body read as text
    pub body: String,
}
