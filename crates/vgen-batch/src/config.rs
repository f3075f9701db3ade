//! Batch orchestration configuration.

use std::time::Duration;

/// Timing and retry knobs for a batch run.
///
/// The defaults reproduce the schedule the remote service is known to
/// tolerate: 10 submission attempts with linear 3s × n backoff, a 3s
/// polling tick, and a fixed 1s pause between items.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum create-task attempts per item (including the first).
    pub submit_max_attempts: u32,
    /// Backoff step between attempts; attempt n is followed by a wait of
    /// `submit_backoff_step * n` (linear, not exponential).
    pub submit_backoff_step: Duration,
    /// Delay between consecutive status queries.
    pub poll_interval: Duration,
    /// Pacing delay inserted after each batch item.
    pub pacing_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            submit_max_attempts: 10,
            submit_backoff_step: Duration::from_millis(3000),
            poll_interval: Duration::from_millis(3000),
            pacing_delay: Duration::from_millis(1000),
        }
    }
}

impl BatchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            submit_max_attempts: std::env::var("VGEN_SUBMIT_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            submit_backoff_step: Duration::from_millis(
                std::env::var("VGEN_SUBMIT_BACKOFF_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            ),
            poll_interval: Duration::from_millis(
                std::env::var("VGEN_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            ),
            pacing_delay: Duration::from_millis(
                std::env::var("VGEN_PACING_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
        }
    }
}
