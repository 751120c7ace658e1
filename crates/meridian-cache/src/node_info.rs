//! Per-node aggregation of placed pods.

use meridian_api::{ContainerPort, Node, Pod, Taint, Uid};
use std::collections::BTreeSet;

use crate::error::{CacheError, Result};
use crate::resource::{NonzeroDefaults, Resource};

/// The aggregate view of a single node: the pods accounted to it, the sum
/// of their requests, the host ports they claim, and the node's own
/// attributes once observed.
///
/// A `NodeInfo` exists while its node has been observed or at least one
/// pod is placed on it. The generation counter increments on every
/// structural mutation so snapshot consumers can skip unchanged nodes.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    node: Option<Node>,
    pods: Vec<Pod>,
    requested: Resource,
    nonzero: Resource,
    allocatable: Resource,
    taints: Vec<Taint>,
    used_ports: BTreeSet<String>,
    generation: u64,
    defaults: NonzeroDefaults,
}

impl NodeInfo {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new(defaults: NonzeroDefaults) -> Self {
        Self {
            node: None,
            pods: Vec::new(),
            requested: Resource::new(),
            nonzero: Resource::new(),
            allocatable: Resource::new(),
            taints: Vec::new(),
            used_ports: BTreeSet::new(),
            generation: 0,
            defaults,
        }
    }

    /// The latest observed node object, if any.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Pods currently accounted to this node, in insertion order.
    #[must_use]
    pub fn pods(&self) -> &[Pod] {
        &self.pods
    }

    /// Sum of the declared container requests over [`Self::pods`].
    #[must_use]
    pub fn requested_resource(&self) -> &Resource {
        &self.requested
    }

    /// Sum of the normalised requests over [`Self::pods`]: absent CPU and
    /// memory requests count as the configured defaults. Scalar resources
    /// are not tracked here.
    #[must_use]
    pub fn nonzero_request(&self) -> &Resource {
        &self.nonzero
    }

    /// The node's advertised allocatable capacity; zero until a node
    /// object is observed.
    #[must_use]
    pub fn allocatable_resource(&self) -> &Resource {
        &self.allocatable
    }

    /// Taints copied from the node spec.
    #[must_use]
    pub fn taints(&self) -> &[Taint] {
        &self.taints
    }

    /// Host-port keys claimed by the pods on this node, encoded as
    /// `"<PROTOCOL>/<hostIP>/<hostPort>"`.
    #[must_use]
    pub fn used_ports(&self) -> &BTreeSet<String> {
        &self.used_ports
    }

    /// Mutation counter for incremental snapshots.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when no pods are accounted and no node object is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pods.is_empty() && self.node.is_none()
    }

    /// Accounts a pod to this node.
    pub fn add_pod(&mut self, pod: Pod) {
        for container in &pod.spec.containers {
            self.requested.add(&container.resources.requests);
            let (cpu, memory) = self.defaults.normalise(&container.resources.requests);
            self.nonzero.milli_cpu += cpu;
            self.nonzero.memory += memory;
        }
        self.used_ports.extend(pod_port_keys(&pod));
        self.pods.push(pod);
        self.generation += 1;
    }

    /// Removes the pod with `pod`'s UID, subtracting its requests and
    /// recomputing the port set from the remaining pods. Relative pod
    /// order is preserved.
    pub fn remove_pod(&mut self, pod: &Pod) -> Result<()> {
        let index = self
            .pods
            .iter()
            .position(|candidate| candidate.uid() == pod.uid())
            .ok_or_else(|| CacheError::PodNotFound(Uid::from(pod.uid())))?;
        let removed = self.pods.remove(index);

        for container in &removed.spec.containers {
            self.requested.sub(&container.resources.requests);
            let (cpu, memory) = self.defaults.normalise(&container.resources.requests);
            self.nonzero.milli_cpu = (self.nonzero.milli_cpu - cpu).max(0);
            self.nonzero.memory = (self.nonzero.memory - memory).max(0);
        }
        self.used_ports = self.pods.iter().flat_map(pod_port_keys).collect();
        self.generation += 1;
        Ok(())
    }

    /// Swaps the stored object for the pod with `pod`'s UID without
    /// touching the aggregates. Used when the authority confirms an
    /// assumption on the same node: the accounting from assume time
    /// stands, only the object is refreshed.
    pub(crate) fn replace_pod(&mut self, pod: Pod) -> Result<()> {
        let slot = self
            .pods
            .iter_mut()
            .find(|candidate| candidate.uid() == pod.uid())
            .ok_or_else(|| CacheError::PodNotFound(Uid::from(pod.uid())))?;
        *slot = pod;
        self.generation += 1;
        Ok(())
    }

    /// Attaches or refreshes the node object, its allocatable capacity and
    /// taints.
    pub fn set_node(&mut self, node: Node) {
        self.allocatable = Resource::from_list(&node.status.allocatable);
        self.taints = node.spec.taints.clone();
        self.node = Some(node);
        self.generation += 1;
    }

    /// Detaches the node object and clears its attributes. Pods are left
    /// accounted; they keep the aggregate alive until they drain.
    pub fn remove_node(&mut self) {
        self.node = None;
        self.allocatable = Resource::new();
        self.taints.clear();
        self.generation += 1;
    }
}

/// Encodes one claimed host port. An empty host IP binds all interfaces
/// and renders as `0.0.0.0`.
fn port_key(port: &ContainerPort) -> String {
    let host_ip = if port.host_ip.is_empty() {
        "0.0.0.0"
    } else {
        &port.host_ip
    };
    format!("{}/{}/{}", port.protocol, host_ip, port.host_port)
}

/// Keys for every host port a pod's containers claim. Ports without a
/// host port (`host_port == 0`) are not tracked.
fn pod_port_keys(pod: &Pod) -> impl Iterator<Item = String> + '_ {
    pod.spec
        .containers
        .iter()
        .flat_map(|container| &container.ports)
        .filter(|port| port.host_port != 0)
        .map(port_key)
}
