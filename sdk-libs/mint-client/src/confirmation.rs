use std::time::Duration;

use solana_sdk::commitment_config::CommitmentConfig;

/// Polling budget for a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationConfig {
    /// Signature status polls before giving up.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub commitment: CommitmentConfig,
    /// Resend the same signed transaction while it is unconfirmed.
    pub rebroadcast: bool,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
            commitment: CommitmentConfig::confirmed(),
            rebroadcast: true,
        }
    }
}

impl ConfirmationConfig {
    /// Delay before poll number `attempt` (starting at 1), doubling up to `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Upper bound of the time spent polling, ignoring request latency.
    pub fn total_budget(&self) -> Duration {
        (1..=self.max_attempts).map(|attempt| self.delay_for_attempt(attempt)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff() {
        let config = ConfirmationConfig::default();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(40), Duration::from_secs(4));

        let short = ConfirmationConfig {
            max_attempts: 3,
            ..Default::default()
        };
        assert_eq!(short.total_budget(), Duration::from_millis(3500));
    }
}
