//! Retry policy for transient transport failures.
//!
//! Exponential backoff with optional jitter. Only errors classified as
//! retryable by [`ClientError::is_retryable`] are retried: resubmitting a
//! signed envelope is safe because nodes deduplicate by transaction digest,
//! but an error the node produced after executing a request is final.
//!
//! [`ClientError::is_retryable`]: sui_client_types::ClientError::is_retryable

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Initial delay before the first retry (in milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// Base for exponential backoff (typically 2.0).
    pub exponential_base: f64,
    /// Whether to add random jitter to delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            exponential_base: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Creates a config with no retries (fail fast).
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculates the delay for a given attempt number.
    #[allow(clippy::cast_possible_truncation)] // Delay is bounded by max_delay_ms
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(0);
        }

        let base_delay = self.initial_delay_ms as f64
            * self.exponential_base.powi(attempt.saturating_sub(1) as i32);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.jitter {
            let jitter_range = capped_delay * 0.5;
            let jitter = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;
            (capped_delay + jitter).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay_ms, 100);
        assert!(config.jitter);
    }

    #[test]
    fn test_no_retry_config() {
        assert_eq!(RetryConfig::no_retry().max_retries, 0);
    }

    #[test]
    fn test_delay_calculation_no_jitter() {
        let config = RetryConfig {
            initial_delay_ms: 100,
            exponential_base: 2.0,
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(0));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig {
            initial_delay_ms: 1000,
            max_delay_ms: 2000,
            exponential_base: 2.0,
            jitter: false,
            ..Default::default()
        };

        // Attempt 3 would be 1000 * 2^2 = 4000ms, but capped at 2000ms
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_jittered_delay_stays_bounded() {
        let config = RetryConfig {
            initial_delay_ms: 100,
            exponential_base: 2.0,
            jitter: true,
            ..Default::default()
        };
        for _ in 0..20 {
            let delay = config.delay_for_attempt(1).as_millis();
            assert!(delay <= 150, "jittered delay {delay} out of range");
        }
    }
}
