//! Identifier remapping produced by region removal.

use alloc::collections::btree_map::{self, BTreeMap};
use core::fmt;

use crate::area::AreaId;

/// Record of the area identifiers which were retired by
/// [`RegionsRegister::remove_region`], each paired with the identifier of the
/// live area that absorbed it.
///
/// Any state the caller keeps per [`AreaId`] (e.g. a bounding box) must be
/// folded from the old identifier into the new one. Identifiers which kept
/// their value, or which were deleted outright, do not appear here.
///
/// [`RegionsRegister::remove_region`]: crate::RegionsRegister::remove_region
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IdRemap {
    map: BTreeMap<AreaId, AreaId>,
}

impl IdRemap {
    /// Creates an empty remap.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, old: AreaId, new: AreaId) {
        let prev = self.map.insert(old, new);
        debug_assert!(prev.is_none(), "{old} remapped twice");
    }

    /// Returns the identifier that replaced `old`, if it was retired.
    #[must_use]
    pub fn get(&self, old: AreaId) -> Option<AreaId> {
        self.map.get(&old).copied()
    }

    /// Maps `id` to the identifier that should be used from now on: the
    /// replacement if `id` was retired, or `id` itself otherwise.
    #[must_use]
    pub fn resolve(&self, id: AreaId) -> AreaId {
        self.get(id).unwrap_or(id)
    }

    /// Number of retired identifiers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no identifier changed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(old, new)` pairs in ascending order of `old`.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (AreaId, AreaId)> + ExactSizeIterator {
        self.map.iter().map(|(&old, &new)| (old, new))
    }

    /// Returns the underlying ordered map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<AreaId, AreaId> {
        self.map
    }
}

impl IntoIterator for IdRemap {
    type Item = (AreaId, AreaId);
    type IntoIter = btree_map::IntoIter<AreaId, AreaId>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl FromIterator<(AreaId, AreaId)> for IdRemap {
    fn from_iter<I: IntoIterator<Item = (AreaId, AreaId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for IdRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (old, new)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{old} -> {new}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for IdRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
