//! Label selectors.

use serde::{Deserialize, Serialize};

use crate::meta::LabelMap;

/// A predicate over an object's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Matches every object.
    #[default]
    Everything,
    /// Matches objects carrying all of the given key/value pairs.
    MatchLabels(LabelMap),
}

impl Selector {
    /// The selector that matches everything.
    #[must_use]
    pub const fn everything() -> Self {
        Self::Everything
    }

    /// A selector requiring all of `labels` to be present.
    #[must_use]
    pub fn match_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::MatchLabels(
            labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true when `labels` satisfy this selector.
    #[must_use]
    pub fn matches(&self, labels: &LabelMap) -> bool {
        match self {
            Self::Everything => true,
            Self::MatchLabels(required) => required
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value)),
        }
    }
}
