use std::fmt::Display;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed-delay retry policy: no backoff, no jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub attempts: u32,
    /// Pause between consecutive attempts
    pub delay_secs: u64,
}

impl RetryPolicy {
    /// Attempts actually made; a policy of zero still makes one call
    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Call `op` until it succeeds or the attempts run out.
    ///
    /// Every error is retried; the error of the final attempt is returned.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.effective_attempts();
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "attempt failed, retrying");
                    thread::sleep(self.delay());
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_secs: 10,
        }
    }
}
