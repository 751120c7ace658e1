//! The scheduler cache: optimistic assumptions reconciled against the
//! authoritative event stream.

use meridian_api::{Node, Pod, PodDisruptionBudget, Selector, Uid};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::node_info::NodeInfo;
use crate::resource::NonzeroDefaults;

/// Lifecycle state of a pod held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PodState {
    /// The scheduler decided on a placement; the authority has not
    /// confirmed it yet.
    Assumed,
    /// The authority confirmed the placement through the event stream.
    Bound,
}

#[derive(Debug, Clone)]
struct PodEntry {
    pod: Pod,
    state: PodState,
    /// Set once binding has finished. An assumed pod without a deadline is
    /// a binding still in flight and is never expired.
    deadline: Option<Instant>,
}

#[derive(Debug, Default)]
struct CacheState {
    pods: HashMap<Uid, PodEntry>,
    /// Deadline-ordered queue over assumed pods whose binding finished.
    expiry: BTreeSet<(Instant, Uid)>,
    nodes: HashMap<String, NodeInfo>,
    pdbs: HashMap<(String, String), PodDisruptionBudget>,
}

impl CacheState {
    /// Aggregates `pod` onto its target node, creating the aggregate on
    /// first use.
    fn add_to_node(&mut self, defaults: NonzeroDefaults, pod: Pod) {
        self.nodes
            .entry(pod.node_name().to_string())
            .or_insert_with(|| NodeInfo::new(defaults))
            .add_pod(pod);
    }

    /// De-aggregates `pod` from its node and drops the aggregate once it
    /// holds neither pods nor a node object.
    fn remove_from_node(&mut self, pod: &Pod) -> Result<()> {
        let info = self
            .nodes
            .get_mut(pod.node_name())
            .ok_or_else(|| CacheError::NodeNotFound(pod.node_name().to_string()))?;
        info.remove_pod(pod)?;
        if info.is_empty() {
            self.nodes.remove(pod.node_name());
        }
        Ok(())
    }

    /// Removes an assumed pod entirely: state table, expiry queue and node
    /// aggregate.
    fn evict(&mut self, uid: &Uid) -> Result<()> {
        let entry = self
            .pods
            .remove(uid)
            .ok_or_else(|| CacheError::PodNotFound(uid.clone()))?;
        if let Some(deadline) = entry.deadline {
            self.expiry.remove(&(deadline, uid.clone()));
        }
        self.remove_from_node(&entry.pod)
    }
}

/// An eventually-consistent view of cluster state for a scheduling loop.
///
/// The cache reconciles three inputs: placements the scheduler assumes
/// optimistically, add/update/delete events from the authoritative stream,
/// and a TTL after which an unconfirmed assumption is treated as a silent
/// binding failure and swept. All state lives behind one readers-writer
/// lock; every operation is linearisable with respect to every other, and
/// everything handed back to callers is a defensive clone.
#[derive(Debug)]
pub struct Cache {
    config: CacheConfig,
    state: RwLock<CacheState>,
}

impl Cache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Returns the configuration the cache was built with.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Optimistically accounts a pod onto its target node before the
    /// authority confirms the binding.
    ///
    /// Fails with [`CacheError::PodAlreadyExists`] when the UID is already
    /// held in any state.
    pub fn assume_pod(&self, pod: Pod) -> Result<()> {
        let mut guard = self.state.write();
        let uid = pod.uid().to_string();
        if guard.pods.contains_key(&uid) {
            return Err(CacheError::PodAlreadyExists(uid));
        }
        guard.add_to_node(self.config.nonzero, pod.clone());
        guard.pods.insert(
            uid,
            PodEntry {
                pod,
                state: PodState::Assumed,
                deadline: None,
            },
        );
        Ok(())
    }

    /// Records that the binding request for an assumed pod was dispatched
    /// now; the expiration countdown starts from this moment.
    pub fn finish_binding(&self, pod: &Pod) -> Result<()> {
        self.finish_binding_at(pod, Instant::now())
    }

    /// [`Self::finish_binding`] with an explicit dispatch timestamp, for
    /// deterministic control over the expiration clock.
    pub fn finish_binding_at(&self, pod: &Pod, now: Instant) -> Result<()> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let uid = pod.uid().to_string();
        let entry = state
            .pods
            .get_mut(&uid)
            .ok_or_else(|| CacheError::PodNotFound(uid.clone()))?;
        if entry.state != PodState::Assumed {
            return Err(CacheError::PodNotAssumed(uid));
        }
        let deadline = now + self.config.assume_ttl;
        if let Some(previous) = entry.deadline.replace(deadline) {
            state.expiry.remove(&(previous, uid.clone()));
        }
        state.expiry.insert((deadline, uid));
        Ok(())
    }

    /// Withdraws an assumption, restoring the cache to its state before
    /// [`Self::assume_pod`].
    ///
    /// The reported node name must match the recorded assumption; a
    /// mismatch means the caller raced a newer placement and the forget is
    /// rejected.
    pub fn forget_pod(&self, pod: &Pod) -> Result<()> {
        let mut guard = self.state.write();
        let uid = pod.uid().to_string();
        match guard.pods.get(&uid) {
            None => return Err(CacheError::PodNotFound(uid)),
            Some(entry) if entry.state != PodState::Assumed => {
                return Err(CacheError::PodNotAssumed(uid))
            }
            Some(entry) if entry.pod.node_name() != pod.node_name() => {
                return Err(CacheError::NodeNameMismatch {
                    uid,
                    assumed_node: entry.pod.node_name().to_string(),
                    reported_node: pod.node_name().to_string(),
                })
            }
            Some(_) => {}
        }
        guard.evict(&uid)
    }

    /// Applies an authoritative pod-added event.
    ///
    /// Confirms a matching assumption in place (the accounting from assume
    /// time stands; only the stored object is refreshed), moves the pod
    /// when the authority placed it on a different node than assumed, and
    /// inserts it fresh when the assumption already expired.
    pub fn add_pod(&self, pod: Pod) -> Result<()> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let uid = pod.uid().to_string();
        let current = state
            .pods
            .get(&uid)
            .map(|entry| (entry.state, entry.pod.clone(), entry.deadline));
        match current {
            Some((PodState::Bound, ..)) => return Err(CacheError::PodAlreadyBound(uid)),
            Some((PodState::Assumed, assumed_pod, deadline)) => {
                if let Some(deadline) = deadline {
                    state.expiry.remove(&(deadline, uid.clone()));
                }
                if assumed_pod.node_name() == pod.node_name() {
                    let info = state.nodes.get_mut(pod.node_name()).ok_or_else(|| {
                        CacheError::NodeNotFound(pod.node_name().to_string())
                    })?;
                    info.replace_pod(pod.clone())?;
                } else {
                    state.remove_from_node(&assumed_pod)?;
                    state.add_to_node(self.config.nonzero, pod.clone());
                }
            }
            None => state.add_to_node(self.config.nonzero, pod.clone()),
        }
        state.pods.insert(
            uid,
            PodEntry {
                pod,
                state: PodState::Bound,
                deadline: None,
            },
        );
        Ok(())
    }

    /// Applies an authoritative pod-updated event, re-aggregating the pod
    /// under its new shape (possibly onto a different node).
    pub fn update_pod(&self, old: &Pod, new: Pod) -> Result<()> {
        let mut guard = self.state.write();
        let uid = old.uid().to_string();
        let recorded = match guard.pods.get(&uid) {
            None => return Err(CacheError::PodNotFound(uid)),
            Some(entry) if entry.state != PodState::Bound => {
                return Err(CacheError::PodNotBound(uid))
            }
            Some(entry) => entry.pod.clone(),
        };
        guard.remove_from_node(&recorded)?;
        guard.add_to_node(self.config.nonzero, new.clone());
        guard.pods.insert(
            uid,
            PodEntry {
                pod: new,
                state: PodState::Bound,
                deadline: None,
            },
        );
        Ok(())
    }

    /// Applies an authoritative pod-deleted event.
    pub fn remove_pod(&self, pod: &Pod) -> Result<()> {
        let mut guard = self.state.write();
        let uid = pod.uid().to_string();
        let recorded = match guard.pods.get(&uid) {
            None => return Err(CacheError::PodNotFound(uid)),
            Some(entry) if entry.state != PodState::Bound => {
                return Err(CacheError::PodNotBound(uid))
            }
            Some(entry) => entry.pod.clone(),
        };
        guard.remove_from_node(&recorded)?;
        guard.pods.remove(&uid);
        Ok(())
    }

    /// True when the pod is held as an unconfirmed assumption.
    #[must_use]
    pub fn is_assumed_pod(&self, pod: &Pod) -> bool {
        self.state
            .read()
            .pods
            .get(pod.uid())
            .is_some_and(|entry| entry.state == PodState::Assumed)
    }

    /// Returns a clone of the cached pod with `pod`'s UID.
    pub fn get_pod(&self, pod: &Pod) -> Result<Pod> {
        self.state
            .read()
            .pods
            .get(pod.uid())
            .map(|entry| entry.pod.clone())
            .ok_or_else(|| CacheError::PodNotFound(pod.uid().to_string()))
    }

    /// Returns clones of every cached pod, assumed and bound alike, whose
    /// labels match `selector`.
    #[must_use]
    pub fn list(&self, selector: &Selector) -> Vec<Pod> {
        self.state
            .read()
            .pods
            .values()
            .filter(|entry| selector.matches(entry.pod.labels()))
            .map(|entry| entry.pod.clone())
            .collect()
    }

    /// Applies a node-added event.
    pub fn add_node(&self, node: Node) {
        let mut guard = self.state.write();
        let defaults = self.config.nonzero;
        guard
            .nodes
            .entry(node.name().to_string())
            .or_insert_with(|| NodeInfo::new(defaults))
            .set_node(node);
    }

    /// Applies a node-updated event. Always advances the node's
    /// generation, even for a semantically identical re-apply, so snapshot
    /// consumers re-clone rather than risk staleness.
    pub fn update_node(&self, node: Node) {
        self.add_node(node);
    }

    /// Applies a node-deleted event. Only the node attributes are
    /// cleared; pods still accounted to the node keep the aggregate alive
    /// until they drain, after which it disappears.
    pub fn remove_node(&self, node: &Node) -> Result<()> {
        let mut guard = self.state.write();
        let info = guard
            .nodes
            .get_mut(node.name())
            .ok_or_else(|| CacheError::NodeNotFound(node.name().to_string()))?;
        info.remove_node();
        if info.is_empty() {
            guard.nodes.remove(node.name());
        }
        Ok(())
    }

    /// Incrementally refreshes `snapshot` to mirror the cached node
    /// aggregates: entries whose generation is current are left alone,
    /// changed or new entries are replaced with clones, and entries for
    /// nodes the cache no longer tracks are dropped. Idempotent when
    /// nothing mutated in between.
    pub fn update_node_info_map(&self, snapshot: &mut HashMap<String, NodeInfo>) {
        let guard = self.state.read();
        for (name, info) in &guard.nodes {
            let stale = snapshot
                .get(name)
                .map_or(true, |existing| existing.generation() != info.generation());
            if stale {
                snapshot.insert(name.clone(), info.clone());
            }
        }
        snapshot.retain(|name, _| guard.nodes.contains_key(name));
    }

    /// Stores a disruption budget under its `(namespace, name)` key.
    pub fn add_pdb(&self, pdb: PodDisruptionBudget) {
        self.state.write().pdbs.insert(pdb.key(), pdb);
    }

    /// Replaces a disruption budget under its `(namespace, name)` key;
    /// inserting when absent makes the replacement idempotent.
    pub fn update_pdb(&self, pdb: PodDisruptionBudget) {
        self.add_pdb(pdb);
    }

    /// Removes a disruption budget. Removing an unknown budget is an
    /// error, not a no-op.
    pub fn remove_pdb(&self, pdb: &PodDisruptionBudget) -> Result<()> {
        let (namespace, name) = pdb.key();
        self.state
            .write()
            .pdbs
            .remove(&(namespace.clone(), name.clone()))
            .map(|_| ())
            .ok_or(CacheError::PdbNotFound { namespace, name })
    }

    /// Returns clones of every stored disruption budget whose labels match
    /// `selector`.
    #[must_use]
    pub fn list_pdbs(&self, selector: &Selector) -> Vec<PodDisruptionBudget> {
        self.state
            .read()
            .pdbs
            .values()
            .filter(|pdb| selector.matches(&pdb.metadata.labels))
            .cloned()
            .collect()
    }

    /// Sweeps every finished-binding assumption whose deadline has passed,
    /// treating each as a silently failed binding: the pod is evicted from
    /// the state table and de-aggregated from its node. Returns the
    /// expired UIDs.
    ///
    /// Assumptions whose binding never finished carry no deadline and are
    /// never swept. Inconsistencies are logged and skipped; the sweeper
    /// never panics.
    pub fn cleanup_assumed_pods(&self, now: Instant) -> Vec<Uid> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let mut expired = Vec::new();
        while let Some((deadline, uid)) = state.expiry.iter().next().cloned() {
            if deadline >= now {
                break;
            }
            state.expiry.remove(&(deadline, uid.clone()));
            match state.pods.get(&uid).map(|entry| entry.state) {
                None => {
                    error!(pod = %uid, "expired assumption references a pod missing from the state table");
                }
                Some(PodState::Bound) => {
                    error!(pod = %uid, "bound pod found in the expiry queue; leaving it in place");
                }
                Some(PodState::Assumed) => match state.evict(&uid) {
                    Ok(()) => expired.push(uid),
                    Err(err) => {
                        error!(pod = %uid, error = %err, "failed to evict expired assumption");
                    }
                },
            }
        }
        expired
    }

    /// Runs the periodic sweeper until `cancel` fires.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        if self.config.sweep_interval > self.config.assume_ttl {
            warn!(
                sweep_interval_secs = self.config.sweep_interval.as_secs(),
                assume_ttl_secs = self.config.assume_ttl.as_secs(),
                "sweep interval exceeds the assumption TTL; expired assumptions will linger"
            );
        }
        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for uid in self.cleanup_assumed_pods(Instant::now()) {
                        warn!(pod = %uid, "assumed pod expired without confirmation");
                    }
                }
                () = cancel.cancelled() => {
                    info!("scheduler cache sweeper stopping");
                    return;
                }
            }
        }
    }

    /// Spawns [`Self::run`] as a background task.
    pub fn spawn_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(cache.run(cancel))
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
