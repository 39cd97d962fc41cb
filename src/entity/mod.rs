//! The public API of the register hands out "entities": these are newtype
//! wrappers around integers which identify a live object in the register.
//!
//! These types implement the [`EntityRef`] trait which allows them to be
//! converted to and from `usize`, but these will generally contain a smaller
//! integer type internally to reduce memory usage.
//!
//! The design of these types is based on the `cranelift-entity` crate.

#[macro_use]
pub mod base;

pub use base::EntityRef;

/// Returns the smallest entity whose index does not appear in `live`.
///
/// `live` must yield entities in strictly ascending order of index.
pub fn first_unused<K: EntityRef>(live: impl IntoIterator<Item = K>) -> K {
    // The first entity that doesn't match its rank marks a gap.
    let mut next = 0;
    for entity in live {
        debug_assert!(entity.index() >= next, "entities not in ascending order");
        if entity.index() != next {
            break;
        }
        next += 1;
    }
    K::new(next)
}
