//! Pod objects: the unit of placement.

use serde::{Deserialize, Serialize};

use crate::meta::{LabelMap, ObjectMeta};
use crate::quantity::ResourceList;

/// Transport protocol of a container port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP, the protocol assumed when a port declares none.
    #[default]
    Tcp,
    /// UDP.
    Udp,
    /// SCTP.
    Sctp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Sctp => "SCTP",
        };
        f.write_str(name)
    }
}

/// A port declared by a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerPort {
    /// Port name, for diagnostics only.
    pub name: String,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Host IP the port binds to. Empty means all interfaces.
    pub host_ip: String,
    /// Port on the host. Zero when the container does not claim a host
    /// port.
    pub host_port: u16,
    /// Port inside the container.
    pub container_port: u16,
}

/// Declared resource requests and limits of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    /// Amounts the container asks the scheduler to account for.
    pub requests: ResourceList,
    /// Upper bounds enforced at runtime. Not consulted by the scheduler
    /// cache.
    pub limits: ResourceList,
}

/// A container within a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub resources: ResourceRequirements,
    pub ports: Vec<ContainerPort>,
}

/// Desired state of a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodSpec {
    /// Name of the node this pod is placed on. Empty while unscheduled.
    /// May change between observations when the authority places the pod
    /// somewhere other than where it was assumed.
    pub node_name: String,
    pub containers: Vec<Container>,
}

/// A pod as observed through the event stream or assumed by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

impl Pod {
    /// Returns the pod's stable identity.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Returns the placement target, empty while unscheduled.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.spec.node_name
    }

    /// Returns the pod's labels.
    #[must_use]
    pub fn labels(&self) -> &LabelMap {
        &self.metadata.labels
    }
}
