//! Error types for the scheduler cache.

use meridian_api::Uid;
use thiserror::Error;

/// Scheduler cache errors.
///
/// Every failure is surfaced to the caller; the cache recovers nothing
/// internally and never retries.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Referenced pod is absent from the cache.
    #[error("pod {0} not found")]
    PodNotFound(Uid),

    /// An assumption was made for a UID already present.
    #[error("pod {0} already exists in the cache")]
    PodAlreadyExists(Uid),

    /// The event stream added a pod the cache already holds as bound.
    #[error("pod {0} was already added")]
    PodAlreadyBound(Uid),

    /// Operation requires an assumed pod.
    #[error("pod {0} is not assumed")]
    PodNotAssumed(Uid),

    /// Operation requires a bound pod.
    #[error("pod {0} is not bound")]
    PodNotBound(Uid),

    /// A forget referenced a different node than the assumption recorded.
    #[error("pod {uid} was assumed on {assumed_node} but forgotten for {reported_node}")]
    NodeNameMismatch {
        uid: Uid,
        assumed_node: String,
        reported_node: String,
    },

    /// Referenced node is absent from the cache.
    #[error("node {0} not found")]
    NodeNotFound(String),

    /// Referenced disruption budget is absent from the cache.
    #[error("disruption budget {namespace}/{name} not found")]
    PdbNotFound { namespace: String, name: String },
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
