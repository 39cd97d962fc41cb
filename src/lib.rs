//! A small in-memory register which assigns compact integer identifiers to
//! combinations of named regions, and keeps those identifiers consistent as
//! regions are removed.
//!
//! This crate is compatible with `#![no_std]` and only requires `alloc`.
//! The default `sync` feature pulls in `std`, so `no_std` users must depend
//! on it with `default-features = false`.
//!
//! # Usage
//!
//! A region is identified by an opaque string label, e.g. the name of a
//! spatial zone or of an entity instance. An [`Area`] is a set of such labels
//! and represents the part of the world which belongs to all of these regions
//! at once. The embedding application typically tracks some geometric extent
//! (bounding box, occupancy grid cells, ...) per area and tags it with the
//! [`AreaId`] handed out by [`RegionsRegister::add_area`].
//!
//! The register always assigns the smallest identifier which is not currently
//! in use, so identifiers stay small and can be used to index dense arrays.
//!
//! # Removing regions
//!
//! When a region disappears, [`RegionsRegister::remove_region`] strips its
//! label from every area:
//!
//! - An area consisting only of that label is deleted and its identifier is
//!   freed.
//! - An area that still has other labels left keeps its identifier, unless an
//!   area with exactly the remaining labels already exists. In that case the
//!   two areas merge: the identifier of the shrunk area is retired and
//!   reported in the returned [`IdRemap`], which the caller must apply to any
//!   state it keeps per identifier.
//!
//! # Concurrency
//!
//! [`RegionsRegister`] is a plain owned value. When it needs to be shared
//! between threads, wrap it in a [`SharedRegionsRegister`] (requires the
//! `sync` feature), which serializes all operations through a single
//! re-entrant lock.
//!
//! # Validation
//!
//! The [`debug_utils`] module contains an invariant validator and a checker
//! which replays operation scripts against a naive reference model. Setting
//! [`Options::verify_invariants`] runs the validator after every mutation.

#![no_std]
#![warn(rust_2018_idioms, missing_docs)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::too_many_lines,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]
#![warn(
    clippy::explicit_iter_loop,
    clippy::range_plus_one,
    clippy::map_unwrap_or,
    clippy::cloned_instead_of_copied,
    clippy::semicolon_if_nothing_returned,
    clippy::must_use_candidate,
    clippy::iter_without_into_iter,
    clippy::uninlined_format_args,
    clippy::ignored_unit_patterns
)]

extern crate alloc;
#[cfg(feature = "clap")]
extern crate std;

use core::fmt;

// Trace logging is only compiled in when the `trace-log` feature is enabled,
// since formatting the arguments is costly even with the logger filtered.
macro_rules! trace {
    ($($tt:tt)*) => {
        if cfg!(feature = "trace-log") {
            ::log::trace!($($tt)*);
        }
    };
}

// Macro for collecting statistics.
macro_rules! stat {
    ($stats:expr, $field:ident) => {
        $stats.$field += 1
    };
    ($stats:expr, $field:ident, $count:expr) => {
        $stats.$field += $count
    };
}

#[macro_use]
pub mod entity;

pub mod area;
pub mod debug_utils;
pub mod remap;

mod register;
#[cfg(feature = "sync")]
mod sync;

pub use area::{Area, AreaId};
pub use register::RegionsRegister;
pub use remap::IdRemap;
#[cfg(feature = "sync")]
pub use sync::SharedRegionsRegister;

/// Configuration options for a register.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Options {
    /// Records that the register is meant to be shared between threads.
    ///
    /// This is informational only: [`SharedRegionsRegister`] always engages
    /// its lock the same way regardless of this flag.
    #[cfg_attr(feature = "clap", arg(long))]
    pub threaded: bool,

    /// Validate all register invariants after every mutation and panic if
    /// any of them is violated.
    ///
    /// This is relatively expensive (linear in the number of areas) and is
    /// intended for test suites of embedding applications.
    #[cfg_attr(feature = "clap", arg(long))]
    pub verify_invariants: bool,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Options {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            threaded: u.arbitrary()?,
            verify_invariants: true,
        })
    }
}

/// Error returned when an area cannot be registered.
///
/// Rejected areas leave the register untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegisterError {
    /// The area has no labels.
    EmptyArea,

    /// An area with exactly the same labels is already registered under the
    /// given identifier.
    AreaExists(AreaId),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::EmptyArea => write!(f, "area must contain at least one region"),
            RegisterError::AreaExists(id) => write!(f, "area is already registered as {id}"),
        }
    }
}

impl core::error::Error for RegisterError {}

/// Statistics collected by the register.
///
/// This is an opaque type since the set of statistics may vary between
/// different versions of the register, even across minor versions.
///
/// The only supported operations on this type are:
/// * Default initialization
/// * Printing with `Debug` or `Display`
#[derive(Debug, Default, Clone)]
pub struct Stats {
    // Stats from adding areas.
    areas_added: usize,
    gaps_filled: usize,
    rejected_empty: usize,
    rejected_duplicate: usize,

    // Stats from removing regions.
    region_removals: usize,
    standalone_deleted: usize,
    residuals_installed: usize,
    areas_merged: usize,

    // Other mutations.
    clears: usize,
    entity_types_set: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:#?}")
    }
}
