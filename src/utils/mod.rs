pub mod circuit_breaker;
pub mod datetime;
pub mod human_format;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerState};
