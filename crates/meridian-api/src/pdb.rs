//! Pod disruption budgets.

use serde::{Deserialize, Serialize};

use crate::meta::ObjectMeta;
use crate::selector::Selector;

/// Desired state of a disruption budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodDisruptionBudgetSpec {
    /// Minimum number of selected pods that must stay available through a
    /// voluntary disruption.
    pub min_available: Option<i32>,
    /// Which pods the budget covers.
    pub selector: Selector,
}

/// A policy object constraining voluntary disruption of a labelled pod
/// set. The scheduler cache stores and lists these; enforcement happens
/// elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodDisruptionBudget {
    pub metadata: ObjectMeta,
    pub spec: PodDisruptionBudgetSpec,
}

impl PodDisruptionBudget {
    /// Returns the `(namespace, name)` key the budget is stored under.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        self.metadata.namespaced_name()
    }
}
