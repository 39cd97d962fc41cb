//! Base definitions for entity types.

/// A typed wrapper around an integer index.
///
/// Types implementing this trait can be used as compact identifiers handed
/// out by the register, e.g. [`AreaId`].
///
/// [`AreaId`]: crate::area::AreaId
pub trait EntityRef: Copy + Eq + Ord {
    /// Creates a new entity reference from a raw index.
    fn new(index: usize) -> Self;

    /// Returns the index that was used to create this entity reference.
    fn index(self) -> usize;
}

/// Internal helper macro to define a new entity type along with some trait
/// implementations.
macro_rules! entity_def {
    ($($(#[$attr:meta])* $vis:vis entity $name:ident($int:ident);)*) => {
        $(
            $(#[$attr])*
            #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            #[cfg_attr(feature = "serde", serde(transparent))]
            $vis struct $name($int);

            // Inherent copies of the EntityRef methods that are const.
            impl $name {
                /// Creates a new entity reference from a raw index.
                #[inline]
                #[allow(dead_code)]
                $vis const fn new(index: usize) -> Self {
                    debug_assert!(index < ($int::MAX as usize));
                    Self(index as $int)
                }

                /// Returns the index that was used to create this entity reference.
                #[inline]
                #[allow(dead_code)]
                $vis const fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl $crate::entity::EntityRef for $name {
                #[inline]
                fn new(index: usize) -> Self {
                    debug_assert!(index < ($int::MAX as usize));
                    $name(index as $int)
                }

                #[inline]
                fn index(self) -> usize {
                    self.0 as usize
                }
            }

            #[cfg(feature = "arbitrary")]
            impl<'a> arbitrary::Arbitrary<'a> for $name {
                fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
                    // Keep indices small so that they actually hit live entities.
                    Ok(Self(u.int_in_range(0..=64)?))
                }
            }
        )*
    };

    // Same as above but also provides Display/Debug impls.
    ($($(#[$attr:meta])* $vis:vis entity $name:ident($int:ident, $display_prefix:expr);)*) => {
        entity_def! {
            $($(#[$attr])* $vis entity $name($int);)*
        }
        $(
            impl core::fmt::Display for $name {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    write!(f, concat!($display_prefix, "{}"), self.0)
                }
            }

            impl core::fmt::Debug for $name {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    core::fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}
