use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Settings for talking to a pushlog server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushlogConfig {
    /// Per-request timeout
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl PushlogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PushlogConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            retry: RetryPolicy::default(),
        }
    }
}
