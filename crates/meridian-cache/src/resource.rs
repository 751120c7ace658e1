//! Aggregated resource arithmetic.
//!
//! A [`Resource`] is the running sum a node aggregate keeps over its pods'
//! declared requests. The arithmetic is total: addition allocates scalar
//! keys on demand, subtraction saturates at zero.

use meridian_api::{Quantity, ResourceList, RESOURCE_CPU, RESOURCE_MEMORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An element-wise sum of resource amounts.
///
/// CPU is accounted in millicores and memory in bytes; every other
/// resource name is an extended scalar counted in whole units. Absent
/// scalar keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub milli_cpu: i64,
    pub memory: i64,
    pub scalar_resources: BTreeMap<String, i64>,
}

impl Resource {
    /// Creates an empty sum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sum holding the amounts of `list`.
    #[must_use]
    pub fn from_list(list: &ResourceList) -> Self {
        let mut resource = Self::new();
        resource.add(list);
        resource
    }

    /// Adds `list` element-wise.
    pub fn add(&mut self, list: &ResourceList) {
        for (name, quantity) in list {
            match name.as_str() {
                RESOURCE_CPU => self.milli_cpu += quantity.milli_value(),
                RESOURCE_MEMORY => self.memory += quantity.value(),
                _ => {
                    *self.scalar_resources.entry(name.clone()).or_insert(0) += quantity.value();
                }
            }
        }
    }

    /// Subtracts `list` element-wise, clamping every field at zero.
    ///
    /// Scalar keys that reach zero are dropped, so subtracting exactly
    /// what was added restores the sum byte-for-byte.
    pub fn sub(&mut self, list: &ResourceList) {
        for (name, quantity) in list {
            match name.as_str() {
                RESOURCE_CPU => self.milli_cpu = (self.milli_cpu - quantity.milli_value()).max(0),
                RESOURCE_MEMORY => self.memory = (self.memory - quantity.value()).max(0),
                _ => {
                    if let Some(count) = self.scalar_resources.get_mut(name) {
                        *count -= quantity.value();
                        if *count <= 0 {
                            self.scalar_resources.remove(name);
                        }
                    }
                }
            }
        }
    }

    /// Converts the sum back to the external resource-list form.
    #[must_use]
    pub fn to_resource_list(&self) -> ResourceList {
        let mut list = ResourceList::new();
        list.insert(RESOURCE_CPU.to_string(), Quantity::from_milli(self.milli_cpu));
        list.insert(RESOURCE_MEMORY.to_string(), Quantity::from_value(self.memory));
        for (name, count) in &self.scalar_resources {
            list.insert(name.clone(), Quantity::from_value(*count));
        }
        list
    }
}

/// Substitution values applied when a container declares no CPU or memory
/// request.
///
/// Without them a request-less pod would look free to every node, so
/// spreading would collapse onto whichever node sorts first. Extended
/// scalar resources have no substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NonzeroDefaults {
    /// Millicores substituted for an absent CPU request.
    pub milli_cpu: i64,
    /// Bytes substituted for an absent memory request.
    pub memory: i64,
}

impl Default for NonzeroDefaults {
    fn default() -> Self {
        Self {
            milli_cpu: 100,
            memory: 200 * 1024 * 1024,
        }
    }
}

impl NonzeroDefaults {
    /// Returns the `(millicores, bytes)` pair for one container's
    /// requests, substituting the defaults for absent entries.
    #[must_use]
    pub fn normalise(&self, requests: &ResourceList) -> (i64, i64) {
        let cpu = requests
            .get(RESOURCE_CPU)
            .map_or(self.milli_cpu, Quantity::milli_value);
        let memory = requests
            .get(RESOURCE_MEMORY)
            .map_or(self.memory, Quantity::value);
        (cpu, memory)
    }
}
