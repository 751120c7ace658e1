//! Meridian scheduler cache - the in-memory view of cluster state a
//! scheduling loop makes placement decisions against.
//!
//! The cache reconciles three sources of truth:
//!
//! - **Assumptions**: pods the scheduler has decided to place but whose
//!   binding the cluster authority has not yet confirmed
//! - **The event stream**: authoritative add/update/delete notifications
//!   for pods, nodes and disruption budgets
//! - **The expiration window**: a TTL after which an unconfirmed
//!   assumption is treated as a silently failed binding and swept
//!
//! # Architecture
//!
//! All state sits behind a single readers-writer lock: a pod state table
//! keyed by UID, a per-node [`NodeInfo`] aggregate (requested resources,
//! normalised requests, claimed host ports, taints, allocatable capacity,
//! a generation counter), a deadline-ordered expiry queue and a keyed
//! disruption-budget store. The scheduler reads through cloned snapshots
//! ([`Cache::list`], [`Cache::update_node_info_map`]), so nothing it holds
//! aliases cache internals. A background sweeper task expires overdue
//! assumptions on a fixed interval.
//!
//! # Example
//!
//! ```ignore
//! use meridian_cache::{Cache, CacheConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let cache = Arc::new(Cache::new(CacheConfig::default()));
//! let stop = CancellationToken::new();
//! cache.spawn_sweeper(stop.clone());
//!
//! cache.assume_pod(pod.clone())?;
//! cache.finish_binding(&pod)?;
//! // ... the event stream later confirms:
//! cache.add_pod(pod)?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod node_info;
pub mod resource;

// Re-export main types
pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use node_info::NodeInfo;
pub use resource::{NonzeroDefaults, Resource};
