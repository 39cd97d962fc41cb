//! Thread-safe facade over [`RegionsRegister`].

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use parking_lot::ReentrantMutex;

use crate::area::{Area, AreaId};
use crate::remap::IdRemap;
use crate::{Options, RegionsRegister, RegisterError};

/// A [`RegionsRegister`] that can be shared between threads.
///
/// Every operation takes a single re-entrant lock for its whole duration, so
/// concurrent calls are serialized. Results are returned by value since they
/// cannot borrow from the locked register.
///
/// Several operations can be grouped into one critical section with
/// [`atomically`](Self::atomically). The lock is re-entrant, so the grouped
/// operations are simply invoked on the same facade from inside the closure.
pub struct SharedRegionsRegister {
    threaded: bool,
    inner: ReentrantMutex<RefCell<RegionsRegister>>,
}

impl Default for SharedRegionsRegister {
    #[inline]
    fn default() -> Self {
        Self::new(false)
    }
}

impl SharedRegionsRegister {
    /// Creates an empty shared register.
    ///
    /// `threaded` records whether the register is meant to be used from
    /// several threads. The lock is engaged the same way either way.
    #[must_use]
    pub fn new(threaded: bool) -> Self {
        Self::with_options(Options {
            threaded,
            ..Options::default()
        })
    }

    /// Creates an empty shared register.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self::from_register(RegionsRegister::with_options(options))
    }

    /// Wraps an existing register.
    #[must_use]
    pub fn from_register(register: RegionsRegister) -> Self {
        Self {
            threaded: register.options().threaded,
            inner: ReentrantMutex::new(RefCell::new(register)),
        }
    }

    /// Unwraps the underlying register.
    #[must_use]
    pub fn into_inner(self) -> RegionsRegister {
        self.inner.into_inner().into_inner()
    }

    /// Whether the register was created for use from several threads.
    #[must_use]
    pub fn is_threaded(&self) -> bool {
        self.threaded
    }

    /// Runs `f` while holding the lock, so that no other thread can observe
    /// or modify the register until it returns.
    pub fn atomically<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.inner.lock();
        f(self)
    }

    /// Runs `f` with read access to the register while holding the lock.
    ///
    /// Mutating the register through this facade from inside `f` panics,
    /// since the register is already borrowed. Use [`Self::atomically`] to
    /// group reads and writes in one critical section instead.
    pub fn with<R>(&self, f: impl FnOnce(&RegionsRegister) -> R) -> R {
        let guard = self.inner.lock();
        let register = guard.borrow();
        f(&register)
    }

    /// Runs `f` with exclusive access to the register while holding the
    /// lock.
    fn with_mut<R>(&self, f: impl FnOnce(&mut RegionsRegister) -> R) -> R {
        let guard = self.inner.lock();
        let mut register = guard.borrow_mut();
        f(&mut register)
    }

    /// See [`RegionsRegister::add_area`].
    pub fn add_area(&self, area: impl Into<Area>) -> Result<AreaId, RegisterError> {
        let area = area.into();
        self.with_mut(|register| register.add_area(area))
    }

    /// See [`RegionsRegister::remove_region`].
    pub fn remove_region(&self, label: &str) -> IdRemap {
        self.with_mut(|register| register.remove_region(label))
    }

    /// See [`RegionsRegister::find_regions`].
    #[must_use]
    pub fn find_regions(&self, area: &Area) -> Option<AreaId> {
        self.with(|register| register.find_regions(area))
    }

    /// See [`RegionsRegister::find_regions_by_id`].
    #[must_use]
    pub fn find_regions_by_id(&self, id: AreaId) -> Option<Area> {
        self.with(|register| register.find_regions_by_id(id).cloned())
    }

    /// See [`RegionsRegister::clear`].
    pub fn clear(&self) {
        self.with_mut(RegionsRegister::clear);
    }

    /// See [`RegionsRegister::regions_number`].
    #[must_use]
    pub fn regions_number(&self) -> usize {
        self.with(RegionsRegister::regions_number)
    }

    /// See [`RegionsRegister::id`].
    #[must_use]
    pub fn id(&self) -> Option<usize> {
        self.with(RegionsRegister::id)
    }

    /// See [`RegionsRegister::instances`].
    #[must_use]
    pub fn instances(&self) -> Vec<String> {
        self.with(RegionsRegister::instances)
    }

    /// See [`RegionsRegister::entries`].
    #[must_use]
    pub fn entries(&self) -> Vec<Area> {
        self.with(RegionsRegister::entries)
    }

    /// See [`RegionsRegister::areas`].
    #[must_use]
    pub fn areas(&self) -> BTreeMap<Area, AreaId> {
        self.with(RegionsRegister::areas)
    }

    /// See [`RegionsRegister::entity_ids`].
    #[must_use]
    pub fn entity_ids(&self, entity: &str) -> Vec<AreaId> {
        self.with(|register| register.entity_ids(entity))
    }

    /// See [`RegionsRegister::coexistent_entities`].
    #[must_use]
    pub fn coexistent_entities(&self, entity: &str) -> BTreeSet<String> {
        self.with(|register| register.coexistent_entities(entity))
    }

    /// See [`RegionsRegister::add_entity_type`].
    pub fn add_entity_type(&self, entity: impl Into<String>, ty: impl Into<String>) {
        let (entity, ty) = (entity.into(), ty.into());
        self.with_mut(|register| register.add_entity_type(entity, ty));
    }

    /// See [`RegionsRegister::entity_type`].
    #[must_use]
    pub fn entity_type(&self, entity: &str) -> Option<String> {
        self.with(|register| register.entity_type(entity).map(ToString::to_string))
    }

    /// See [`RegionsRegister::print`].
    pub fn print(&self) {
        self.with(RegionsRegister::print);
    }
}

impl From<RegionsRegister> for SharedRegionsRegister {
    fn from(register: RegionsRegister) -> Self {
        Self::from_register(register)
    }
}

impl fmt::Display for SharedRegionsRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|register| fmt::Display::fmt(register, f))
    }
}

impl fmt::Debug for SharedRegionsRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|register| {
            f.debug_struct("SharedRegionsRegister")
                .field("threaded", &self.threaded)
                .field("register", register)
                .finish()
        })
    }
}
