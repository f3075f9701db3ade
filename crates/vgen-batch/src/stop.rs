//! Cooperative stop signal.
//!
//! A watch channel carrying a single boolean. The handle side belongs to
//! whoever can cancel the run (UI, signal handler); the token side is
//! threaded explicitly through submitter, poller, and orchestrator and
//! read at every suspension point. Within one run the flag is write-once:
//! it is set by [`StopHandle::stop`] and never cleared until the next run
//! begins.

use tokio::sync::watch;

/// Create a connected stop handle/token pair.
pub fn stop_channel() -> (StopHandle, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopToken { rx })
}

/// Read side of the stop signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopToken {
    /// Non-blocking check of the stop flag.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Write side of the stop signal.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Request cancellation. Idempotent, and latches even while no token
    /// is currently subscribed (`watch::Sender::send` would refuse to
    /// update the value once every receiver is gone).
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// Get a token observing this handle.
    pub fn token(&self) -> StopToken {
        StopToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Clear the flag for a fresh run. Only the orchestrator calls this,
    /// at the boundary between runs.
    pub(crate) fn reset(&self) {
        self.tx.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_observed_and_idempotent() {
        let (handle, token) = stop_channel();
        assert!(!token.is_stopped());

        handle.stop();
        assert!(token.is_stopped());

        handle.stop();
        assert!(token.is_stopped());
    }

    #[test]
    fn test_tokens_share_one_flag() {
        let (handle, token) = stop_channel();
        let other = token.clone();
        let late = handle.token();

        handle.stop();
        assert!(token.is_stopped());
        assert!(other.is_stopped());
        assert!(late.is_stopped());
    }

    #[test]
    fn test_stop_latches_without_live_tokens() {
        let (handle, token) = stop_channel();
        drop(token);

        // With no subscriber alive the flag must still latch
        handle.stop();
        assert!(handle.token().is_stopped());

        handle.reset();
        assert!(!handle.token().is_stopped());
    }

    #[test]
    fn test_reset_clears_flag_for_next_run() {
        let (handle, token) = stop_channel();
        handle.stop();
        assert!(token.is_stopped());

        handle.reset();
        assert!(!token.is_stopped());
    }
}
