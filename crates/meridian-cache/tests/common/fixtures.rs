//! Test fixtures for scheduler cache integration tests.

use meridian_api::{
    Container, ContainerPort, LabelMap, Node, NodeSpec, NodeStatus, ObjectMeta, Pod,
    PodDisruptionBudget, PodDisruptionBudgetSpec, PodSpec, Protocol, Quantity, ResourceList,
    ResourceRequirements, Selector, Taint, TaintEffect, RESOURCE_CPU, RESOURCE_MEMORY,
};

/// Builder for creating test pods with a single container.
pub struct PodBuilder {
    uid: String,
    namespace: String,
    node: String,
    labels: LabelMap,
    requests: ResourceList,
    ports: Vec<ContainerPort>,
}

impl PodBuilder {
    /// Creates a pod builder; the UID doubles as the pod name.
    pub fn new(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            namespace: "cache-test".to_string(),
            node: String::new(),
            labels: LabelMap::new(),
            requests: ResourceList::new(),
            ports: Vec::new(),
        }
    }

    /// Sets the placement target.
    pub fn on_node(mut self, node: &str) -> Self {
        self.node = node.to_string();
        self
    }

    /// Declares CPU (millicores) and memory (bytes) requests.
    pub fn with_requests(mut self, milli_cpu: i64, memory: i64) -> Self {
        self.requests
            .insert(RESOURCE_CPU.to_string(), Quantity::from_milli(milli_cpu));
        self.requests
            .insert(RESOURCE_MEMORY.to_string(), Quantity::from_value(memory));
        self
    }

    /// Declares an extended scalar resource request.
    pub fn with_scalar(mut self, name: &str, count: i64) -> Self {
        self.requests
            .insert(name.to_string(), Quantity::from_value(count));
        self
    }

    /// Claims a TCP host port.
    pub fn with_host_port(self, host_ip: &str, host_port: u16) -> Self {
        self.with_protocol_port(Protocol::Tcp, host_ip, host_port)
    }

    /// Claims a host port with an explicit protocol.
    pub fn with_protocol_port(mut self, protocol: Protocol, host_ip: &str, host_port: u16) -> Self {
        self.ports.push(ContainerPort {
            protocol,
            host_ip: host_ip.to_string(),
            host_port,
            container_port: host_port,
            ..ContainerPort::default()
        });
        self
    }

    /// Attaches a label.
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Builds the pod.
    pub fn build(self) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: self.uid.clone(),
                namespace: self.namespace,
                uid: self.uid,
                labels: self.labels,
            },
            spec: PodSpec {
                node_name: self.node,
                containers: vec![Container {
                    resources: ResourceRequirements {
                        requests: self.requests,
                        ..ResourceRequirements::default()
                    },
                    ports: self.ports,
                    ..Container::default()
                }],
            },
        }
    }
}

/// Builder for creating test nodes.
pub struct NodeBuilder {
    name: String,
    allocatable: ResourceList,
    taints: Vec<Taint>,
}

impl NodeBuilder {
    /// Creates a node builder with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            allocatable: ResourceList::new(),
            taints: Vec::new(),
        }
    }

    /// Advertises allocatable CPU (millicores) and memory (bytes).
    pub fn with_allocatable(mut self, milli_cpu: i64, memory: i64) -> Self {
        self.allocatable
            .insert(RESOURCE_CPU.to_string(), Quantity::from_milli(milli_cpu));
        self.allocatable
            .insert(RESOURCE_MEMORY.to_string(), Quantity::from_value(memory));
        self
    }

    /// Advertises an extended scalar resource.
    pub fn with_scalar_allocatable(mut self, name: &str, count: i64) -> Self {
        self.allocatable
            .insert(name.to_string(), Quantity::from_value(count));
        self
    }

    /// Applies a taint.
    pub fn with_taint(mut self, key: &str, value: &str, effect: TaintEffect) -> Self {
        self.taints.push(Taint {
            key: key.to_string(),
            value: value.to_string(),
            effect,
        });
        self
    }

    /// Builds the node.
    pub fn build(self) -> Node {
        Node {
            metadata: ObjectMeta {
                name: self.name,
                ..ObjectMeta::default()
            },
            spec: NodeSpec {
                taints: self.taints,
            },
            status: NodeStatus {
                allocatable: self.allocatable,
            },
        }
    }
}

/// Creates a disruption budget covering the given labels.
pub fn make_pdb(
    name: &str,
    namespace: &str,
    labels: &[(&str, &str)],
    min_available: i32,
) -> PodDisruptionBudget {
    let labels: LabelMap = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    PodDisruptionBudget {
        metadata: ObjectMeta {
            name: name.to_string(),
            namespace: namespace.to_string(),
            uid: format!("{namespace}/{name}"),
            labels: labels.clone(),
        },
        spec: PodDisruptionBudgetSpec {
            min_available: Some(min_available),
            selector: Selector::MatchLabels(labels),
        },
    }
}
