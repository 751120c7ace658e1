//! Configuration types for the scheduler cache.

use serde::Deserialize;
use std::time::Duration;

use crate::resource::NonzeroDefaults;

/// Scheduler cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an assumed pod may wait for confirmation after its binding
    /// was dispatched before the sweeper drops it.
    #[serde(with = "serde_duration_secs")]
    pub assume_ttl: Duration,
    /// How often the background sweeper runs. Must not exceed
    /// `assume_ttl`, or expired assumptions linger longer than the TTL
    /// promises.
    #[serde(with = "serde_duration_secs")]
    pub sweep_interval: Duration,
    /// Substitution values used when a container declares no CPU or memory
    /// request. Injected here so tests can pin them.
    pub nonzero: NonzeroDefaults,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            assume_ttl: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(1),
            nonzero: NonzeroDefaults::default(),
        }
    }
}

/// Serde helper for Duration as seconds.
mod serde_duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.assume_ttl, Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
        assert_eq!(config.nonzero.milli_cpu, 100);
        assert_eq!(config.nonzero.memory, 200 * 1024 * 1024);
    }
}
