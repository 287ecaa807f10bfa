//! Circuit breaker for guarding flaky collaborators (SQLite busy errors,
//! provider HTTP calls). Grounded on `utils/circuit_breaker.rs` +
//! `utils/circuit_breaker_simple.rs` in the teacher, trimmed to the single
//! "simple" implementation since teamarr has no multi-backend matrix to
//! support.

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub enum CircuitBreakerError {
    CircuitOpen,
    ServiceError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[repr(u8)]
pub enum CircuitBreakerState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl CircuitBreakerState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Open,
            2 => Self::HalfOpen,
            _ => Self::Closed,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CircuitBreakerStats {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub state: CircuitBreakerState,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

/// A single-writer circuit breaker: closed → open after `failure_threshold`
/// consecutive failures, half-open after `reset_timeout`, closed again
/// after `success_threshold` consecutive successes in half-open.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: AtomicU8,
    consecutive_failures: AtomicU64,
    consecutive_successes: AtomicU64,
    total_calls: AtomicU64,
    successful_calls: AtomicU64,
    failed_calls: AtomicU64,
    opened_at: Mutex<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: AtomicU8::new(CircuitBreakerState::Closed as u8),
            consecutive_failures: AtomicU64::new(0),
            consecutive_successes: AtomicU64::new(0),
            total_calls: AtomicU64::new(0),
            successful_calls: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
            opened_at: Mutex::new(None),
        })
    }

    pub async fn state(&self) -> CircuitBreakerState {
        self.maybe_half_open().await;
        CircuitBreakerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub async fn is_available(&self) -> bool {
        !matches!(self.state().await, CircuitBreakerState::Open)
    }

    async fn maybe_half_open(&self) {
        if self.state.load(Ordering::SeqCst) != CircuitBreakerState::Open as u8 {
            return;
        }
        let mut opened_at = self.opened_at.lock().await;
        if let Some(at) = *opened_at {
            if at.elapsed() >= self.config.reset_timeout {
                self.state
                    .store(CircuitBreakerState::HalfOpen as u8, Ordering::SeqCst);
                *opened_at = None;
            }
        }
    }

    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, CircuitBreakerError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        E: std::fmt::Display,
        T: Send,
    {
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        if !self.is_available().await {
            return Err(CircuitBreakerError::CircuitOpen);
        }

        match operation().await {
            Ok(value) => {
                self.successful_calls.fetch_add(1, Ordering::SeqCst);
                self.consecutive_failures.store(0, Ordering::SeqCst);
                let successes = self.consecutive_successes.fetch_add(1, Ordering::SeqCst) + 1;
                if self.state.load(Ordering::SeqCst) == CircuitBreakerState::HalfOpen as u8
                    && successes >= self.config.success_threshold as u64
                {
                    self.state
                        .store(CircuitBreakerState::Closed as u8, Ordering::SeqCst);
                }
                Ok(value)
            }
            Err(e) => {
                self.failed_calls.fetch_add(1, Ordering::SeqCst);
                self.consecutive_successes.store(0, Ordering::SeqCst);
                let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold as u64 {
                    self.state
                        .store(CircuitBreakerState::Open as u8, Ordering::SeqCst);
                    *self.opened_at.lock().await = Some(Instant::now());
                }
                Err(CircuitBreakerError::ServiceError(e.to_string()))
            }
        }
    }

    pub fn stats(&self) -> CircuitBreakerStats {
        CircuitBreakerStats {
            total_calls: self.total_calls.load(Ordering::SeqCst),
            successful_calls: self.successful_calls.load(Ordering::SeqCst),
            failed_calls: self.failed_calls.load(Ordering::SeqCst),
            state: CircuitBreakerState::from_u8(self.state.load(Ordering::SeqCst)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_after_failure_threshold() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            reset_timeout: Duration::from_millis(20),
            success_threshold: 1,
        });

        for _ in 0..2 {
            let _ = cb
                .execute(|| async { Err::<(), _>("boom") })
                .await;
        }

        assert!(matches!(cb.state().await, CircuitBreakerState::Open));
        assert!(!cb.is_available().await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(matches!(cb.state().await, CircuitBreakerState::HalfOpen));

        let _ = cb.execute(|| async { Ok::<_, &str>(()) }).await;
        assert!(matches!(cb.state().await, CircuitBreakerState::Closed));
    }
}
