//! Sliding-window rate limiter with exponential backoff on 429s, grounded
//! on spec.md §6's TheSportsDB limits: 30 requests/minute, backoff
//! 5/10/20/40/80s capped at 120s, abandoning after 5 attempts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::errors::{ProviderError, ProviderResult};

const BACKOFF_SCHEDULE_SECS: &[u64] = &[5, 10, 20, 40, 80];
const BACKOFF_CAP_SECS: u64 = 120;
const MAX_ATTEMPTS: u32 = 5;

pub struct RateLimiter {
    window: Mutex<VecDeque<Instant>>,
    requests_per_window: usize,
    window_duration: Duration,
}

impl RateLimiter {
    pub fn new(requests_per_window: usize, window_duration: Duration) -> Self {
        Self {
            window: Mutex::new(VecDeque::new()),
            requests_per_window,
            window_duration,
        }
    }

    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(requests_per_minute as usize, Duration::from_secs(60))
    }

    /// Blocks until a slot in the sliding window is free, then records the
    /// new request.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                while window.front().is_some_and(|t| now.duration_since(*t) > self.window_duration) {
                    window.pop_front();
                }
                if window.len() < self.requests_per_window {
                    window.push_back(now);
                    None
                } else {
                    let oldest = *window.front().unwrap();
                    Some(self.window_duration.saturating_sub(now.duration_since(oldest)))
                }
            };

            match wait {
                None => return,
                Some(duration) => sleep(duration).await,
            }
        }
    }

    /// Runs `attempt`, retrying with the configured backoff schedule when
    /// it reports a rate-limit response, and giving up after
    /// [`MAX_ATTEMPTS`].
    pub async fn run_with_backoff<T, F, Fut>(&self, provider: &str, mut attempt: F) -> ProviderResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ProviderResult<T>>,
    {
        for (idx, &backoff_secs) in BACKOFF_SCHEDULE_SECS.iter().enumerate() {
            self.acquire().await;
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(ProviderError::RateLimited { .. }) => {
                    let capped = backoff_secs.min(BACKOFF_CAP_SECS);
                    sleep(Duration::from_secs(capped)).await;
                    if idx as u32 + 1 >= MAX_ATTEMPTS {
                        break;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(ProviderError::RetryBudgetExhausted {
            provider: provider.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_requests_up_to_window_capacity() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.window.lock().await.len(), 3);
    }
}
