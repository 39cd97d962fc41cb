//! Areas are the keys of the register: a set of region labels which is
//! treated as a single unit and assigned a single [`AreaId`].
//!
//! Labels are opaque strings. The register only ever compares them for
//! equality and ordering, so their encoding is entirely up to the caller.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

entity_def! {
    /// Compact identifier of a live [`Area`] in a [`RegionsRegister`].
    ///
    /// The register always hands out the smallest identifier which is not
    /// currently in use, so identifiers are densely packed and freed
    /// identifiers are reused.
    ///
    /// [`RegionsRegister`]: crate::RegionsRegister
    pub entity AreaId(u32, "area");
}

/// Inline storage for labels. Most areas combine only a handful of regions.
type Labels = SmallVec<[String; 4]>;

/// An unordered set of region labels.
///
/// Labels are kept sorted and deduplicated, so two areas built from the same
/// labels compare equal regardless of the order (or repetition) in which the
/// labels were supplied.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<String>", from = "Vec<String>"))]
pub struct Area {
    labels: Labels,
}

impl Area {
    /// Builds an area from a collection of labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Labels = labels.into_iter().map(Into::into).collect();
        labels.sort_unstable();
        labels.dedup();
        Self { labels }
    }

    /// Number of distinct labels in the area.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the area has no labels. Such areas are never stored in a
    /// register.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether the area consists of exactly one label.
    #[inline]
    #[must_use]
    pub fn is_standalone(&self) -> bool {
        self.labels.len() == 1
    }

    /// Returns whether `label` is part of this area.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// The labels of this area, in sorted order.
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterates over the labels of this area, in sorted order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.labels.iter().map(String::as_str)
    }

    /// Returns the area left after removing `label`, or `None` if `label` is
    /// not part of this area.
    ///
    /// The residual of a standalone area is empty.
    #[must_use]
    pub fn without(&self, label: &str) -> Option<Area> {
        let pos = self.position(label)?;
        let mut labels = self.labels.clone();
        labels.remove(pos);
        Some(Area { labels })
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }
}

impl<S: Into<String>> FromIterator<S> for Area {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Area::new(iter)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Area {
    fn from(labels: [S; N]) -> Self {
        Area::new(labels)
    }
}

impl From<&[&str]> for Area {
    fn from(labels: &[&str]) -> Self {
        Area::new(labels.iter().copied())
    }
}

impl From<Vec<String>> for Area {
    fn from(labels: Vec<String>) -> Self {
        Area::new(labels)
    }
}

impl From<Area> for Vec<String> {
    fn from(area: Area) -> Self {
        area.labels.into_vec()
    }
}

impl<'a> IntoIterator for &'a Area {
    type Item = &'a String;
    type IntoIter = core::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, label) in self.labels.iter().enumerate() {
            if i == 0 {
                write!(f, "{label}")?;
            } else {
                write!(f, ", {label}")?;
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.labels.iter()).finish()
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Area {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        // Draw from a small label pool so that generated areas overlap.
        let len = u.int_in_range(1..=4)?;
        let mut labels = Labels::new();
        for _ in 0..len {
            let label: u8 = u.int_in_range(0..=7)?;
            labels.push(alloc::format!("r{label}"));
        }
        Ok(Area::new(labels))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn label_order_and_repetition_do_not_matter() {
        let a = Area::from(["def", "abc"]);
        let b = Area::from(["abc", "def", "abc"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.labels(), &["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn residual_after_removing_a_label() {
        let area = Area::from(["jkl", "mno", "pqr"]);
        assert_eq!(area.without("mno"), Some(Area::from(["jkl", "pqr"])));
        assert_eq!(area.without("xyz"), None);

        let standalone = Area::from(["abc"]);
        assert!(standalone.is_standalone());
        assert!(standalone.without("abc").unwrap().is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(Area::from(["b", "a"]).to_string(), "{a, b}");
        assert_eq!(Area::default().to_string(), "{}");
        assert_eq!(AreaId::new(3).to_string(), "area3");
    }

    #[test]
    fn round_trips_through_vec() {
        let area = Area::from(vec!["x".to_string(), "w".to_string()]);
        let labels: Vec<String> = area.clone().into();
        assert_eq!(labels, vec!["w".to_string(), "x".to_string()]);
        assert_eq!(Area::from(labels), area);
    }
}
