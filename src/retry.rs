//! Capped retry for transient remote calls.
//!
//! Attempts run synchronously with no backoff delay; each failure is logged
//! and the last error is returned on exhaustion. Callers that degrade
//! (defect translations, test stations) map the exhausted error to an empty
//! or default result at the call site.

use std::future::Future;

use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct Retry {
    attempts: u32,
}

impl Retry {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    /// Run `op` up to the configured number of attempts, returning the
    /// first success or the last error.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        for attempt in 1..self.attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.attempts,
                        call = label,
                        error = %e,
                        "Remote call attempt failed"
                    );
                }
            }
        }

        // Final attempt; its error is the one callers see.
        op().await.map_err(|e| {
            warn!(
                attempt = self.attempts,
                max_attempts = self.attempts,
                call = label,
                error = %e,
                "Remote call failed on final attempt"
            );
            e
        })
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(3)
    }
}
