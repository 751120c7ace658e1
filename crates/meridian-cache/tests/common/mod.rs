//! Common test utilities for scheduler cache integration tests.

pub mod fixtures;

use meridian_cache::{Cache, CacheConfig, NodeInfo};
use meridian_api::Pod;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cache under test together with the configuration it was built with.
pub struct TestCache {
    pub cache: Arc<Cache>,
    pub ttl: Duration,
}

impl TestCache {
    /// Creates a test cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a test cache with the given assumption TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_config(CacheConfig {
            assume_ttl: ttl,
            ..CacheConfig::default()
        })
    }

    /// Creates a test cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let ttl = config.assume_ttl;
        Self {
            cache: Arc::new(Cache::new(config)),
            ttl,
        }
    }

    /// Creates a test cache that expires and sweeps quickly, for
    /// time-sensitive sweeper tests.
    pub fn with_fast_sweeper() -> Self {
        Self::with_config(CacheConfig {
            assume_ttl: Duration::from_millis(50),
            sweep_interval: Duration::from_millis(20),
            ..CacheConfig::default()
        })
    }

    /// Dumps the node aggregates through the incremental snapshot path.
    pub fn node_snapshot(&self) -> HashMap<String, NodeInfo> {
        let mut snapshot = HashMap::new();
        self.cache.update_node_info_map(&mut snapshot);
        snapshot
    }
}

impl Default for TestCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Assumes a pod and finishes its binding at `dispatched_at`, the shape
/// every expiry scenario starts from.
pub fn assume_and_finish_binding(cache: &Cache, pod: &Pod, dispatched_at: Instant) {
    cache.assume_pod(pod.clone()).unwrap();
    cache.finish_binding_at(pod, dispatched_at).unwrap();
}
