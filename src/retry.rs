use std::time::Duration;

use reqwest::{Method, StatusCode};

const BACKOFF_MAX_SECS: f64 = 120.0;

/// Resend policy for transient upstream failures. Only idempotent methods
/// are ever replayed; POST and PATCH go out exactly once.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub total: u32,
    pub backoff_factor: f64,
    pub retry_statuses: Vec<StatusCode>,
    pub retry_methods: Vec<Method>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: 5,
            backoff_factor: 2.0,
            retry_statuses: vec![
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::BAD_GATEWAY,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ],
            retry_methods: vec![
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
                Method::TRACE,
            ],
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            total: 0,
            ..Self::default()
        }
    }

    pub fn should_retry(&self, method: &Method, status: StatusCode) -> bool {
        self.total > 0
            && self.retry_methods.contains(method)
            && self.retry_statuses.contains(&status)
    }

    /// Backoff before retry number `attempt` (1-based):
    /// `backoff_factor * 2^(attempt - 1)` seconds, capped at 120 s.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        Duration::from_secs_f64(secs.clamp(0.0, BACKOFF_MAX_SECS))
    }
}
