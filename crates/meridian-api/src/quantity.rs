//! Resource quantities as delivered by the watch layer.
//!
//! Quantity-string parsing ("100m", "1Ki") happens upstream; by the time a
//! quantity reaches this crate it is a plain integer amount.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical resource name for CPU, accounted in millicores.
pub const RESOURCE_CPU: &str = "cpu";

/// Canonical resource name for memory, accounted in bytes.
pub const RESOURCE_MEMORY: &str = "memory";

/// Resource amounts keyed by resource name.
///
/// `cpu` and `memory` are the canonical entries; any other key is an
/// extended scalar resource (`example.com/foo` style).
pub type ResourceList = BTreeMap<String, Quantity>;

/// A parsed resource amount, held in milli-units.
///
/// Milli-units keep fractional CPU exact (`100m` is 100 milli-units) while
/// whole-unit resources such as memory bytes round-trip through
/// [`Quantity::from_value`] / [`Quantity::value`] without loss.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Quantity {
    millis: i64,
}

impl Quantity {
    /// Creates a quantity from a milli-unit amount (`100m` CPU is 100).
    #[must_use]
    pub const fn from_milli(millis: i64) -> Self {
        Self { millis }
    }

    /// Creates a quantity from a whole-unit amount (bytes, counts).
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        Self {
            millis: value * 1000,
        }
    }

    /// Returns the exact milli-unit amount.
    #[must_use]
    pub const fn milli_value(&self) -> i64 {
        self.millis
    }

    /// Returns the whole-unit amount, rounding fractional amounts up.
    #[must_use]
    pub const fn value(&self) -> i64 {
        (self.millis + 999) / 1000
    }

    /// Returns true for a zero amount.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.millis == 0
    }
}
