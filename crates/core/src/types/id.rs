//! Newtype id for catalog entities.
//!
//! Catalog ids are stable across sessions and shared between the static
//! subscription catalog and the cart. Wrapping the raw integer prevents
//! accidentally mixing catalog ids with other numeric values.

use serde::{Deserialize, Serialize};

/// Highest id in the reserved subscription range.
///
/// Catalog entries with an id at or below this value are subscription
/// plans, which may hold at most one unit in the cart at a time.
pub const SUBSCRIPTION_ID_CEILING: i64 = 4;

/// Identifier of a catalog entry and its cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Create a new id from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this id falls in the reserved subscription range.
    #[must_use]
    pub const fn is_subscription(self) -> bool {
        self.0 <= SUBSCRIPTION_ID_CEILING
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for i64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}
