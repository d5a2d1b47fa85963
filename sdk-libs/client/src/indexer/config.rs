use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexerRpcConfig {
    pub retry_config: RetryConfig,
    /// Treat `AssetNotFound` as retryable. Used right after a mint, while
    /// the indexer catches up with the ledger.
    pub retry_not_found: bool,
}

impl IndexerRpcConfig {
    pub fn new(retry_config: RetryConfig) -> Self {
        Self {
            retry_config,
            retry_not_found: false,
        }
    }

    pub fn after_mint() -> Self {
        Self {
            retry_config: RetryConfig::default(),
            retry_not_found: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub num_retries: u32,
    pub delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Delay before retry number `attempt` (starting at 1), doubling up to the cap.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        Duration::from_millis(self.delay_ms.saturating_mul(factor).min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            num_retries: 10,
            delay_ms: 400,
            max_delay_ms: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_for_attempt_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(800));
        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(6400));
        assert_eq!(config.delay_for_attempt(6), Duration::from_millis(8000));
        assert_eq!(config.delay_for_attempt(80), Duration::from_millis(8000));
    }
}
