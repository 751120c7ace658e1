//! Cluster object model shared across meridian components.
//!
//! These are the in-process representations of the objects the scheduler
//! works with: pods, nodes, disruption budgets, resource quantities and
//! label selectors. They mirror what the watch layer delivers after
//! decoding; nothing here talks to the network.

pub mod meta;
pub mod node;
pub mod pdb;
pub mod pod;
pub mod quantity;
pub mod selector;

pub use meta::{LabelMap, ObjectMeta, Uid};
pub use node::{Node, NodeSpec, NodeStatus, Taint, TaintEffect};
pub use pdb::{PodDisruptionBudget, PodDisruptionBudgetSpec};
pub use pod::{Container, ContainerPort, Pod, PodSpec, Protocol, ResourceRequirements};
pub use quantity::{Quantity, ResourceList, RESOURCE_CPU, RESOURCE_MEMORY};
pub use selector::Selector;
