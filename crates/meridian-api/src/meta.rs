//! Object metadata common to every cluster object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable opaque identifier assigned by the cluster authority.
///
/// Two observations with the same UID refer to the same object, whatever
/// their name or namespace say.
pub type Uid = String;

/// Label key/value pairs attached to an object.
pub type LabelMap = BTreeMap<String, String>;

/// Identifying metadata carried by pods, nodes and disruption budgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    /// Object name, unique within its namespace.
    pub name: String,
    /// Namespace the object lives in. Empty for cluster-scoped objects.
    pub namespace: String,
    /// Stable identity. Identity is the UID alone; name and namespace are
    /// for diagnostics.
    pub uid: Uid,
    /// Labels used for selector matching.
    pub labels: LabelMap,
}

impl ObjectMeta {
    /// Returns the `namespace/name` pair used to key namespaced objects.
    #[must_use]
    pub fn namespaced_name(&self) -> (String, String) {
        (self.namespace.clone(), self.name.clone())
    }
}
