//! Broker configuration.

use std::time::Duration;

/// Configuration for a [`Broker`](crate::Broker).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerConfig {
    /// TTL applied by `Broker::put` when no explicit options are given
    pub default_ttl: Option<Duration>,
    /// Log every executed statement at `info` instead of `debug`
    pub log_statements: bool,
}

impl BrokerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default TTL for writes.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Clear the default TTL.
    pub fn no_default_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }

    /// Enable or disable statement logging.
    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = BrokerConfig::new()
            .default_ttl(Duration::from_secs(60))
            .log_statements(true);
        assert_eq!(config.default_ttl, Some(Duration::from_secs(60)));
        assert!(config.log_statements);

        let config = config.no_default_ttl();
        assert_eq!(config.default_ttl, None);
    }

    #[test]
    fn test_config_default() {
        let config = BrokerConfig::default();
        assert_eq!(config.default_ttl, None);
        assert!(!config.log_statements);
    }
}
