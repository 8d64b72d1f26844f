//! Cancellation for the asynchronous entry points.
//!
//! Operations are never split into interruptible steps, so the token is a plain shared flag that
//! is checked once, when an async operation starts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::core::Result;
use crate::error::FsError;

/// A shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is cancelled from the start.
    pub fn cancelled() -> Self {
        let token = Self::new();
        token.cancel();
        token
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`FsError::OperationCancelled`] once the token is cancelled.
    pub fn check(&self) -> Result<()> {
        let cancelled = self.is_cancelled();
        trace!(cancelled, "cancellation check");
        if cancelled {
            return Err(FsError::OperationCancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_passes() {
        assert!(CancellationToken::new().check().is_ok());
    }

    #[test]
    fn test_cancelled_token_fails() {
        let token = CancellationToken::cancelled();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(FsError::OperationCancelled));
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
