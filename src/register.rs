//! The regions register.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use rustc_hash::FxBuildHasher;

use crate::area::{Area, AreaId};
use crate::debug_utils::{self, DisplayRegister};
use crate::entity;
use crate::remap::IdRemap;
use crate::{Options, RegisterError, Stats};

/// Register mapping areas (sets of region labels) to compact identifiers.
///
/// Two ordered maps are maintained in lock step:
/// - `areas` maps each live area to its identifier,
/// - `lookup` maps each live identifier back to its area.
///
/// Both views always describe the same one-to-one relation. Keeping `lookup`
/// ordered makes it cheap to find the smallest free identifier.
///
/// Independently of areas, the register also stores a free-form "type" for
/// arbitrary entity labels.
#[derive(Clone)]
pub struct RegionsRegister {
    options: Options,
    areas: BTreeMap<Area, AreaId>,
    lookup: BTreeMap<AreaId, Area>,
    entity_types: HashMap<String, String, FxBuildHasher>,

    /// Number of areas added since creation or the last `clear`.
    num_added: usize,

    stats: Stats,
}

impl Default for RegionsRegister {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RegionsRegister {
    /// Creates an empty register with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates an empty register.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            areas: BTreeMap::new(),
            lookup: BTreeMap::new(),
            entity_types: HashMap::default(),
            num_added: 0,
            stats: Stats::default(),
        }
    }

    /// Options this register was created with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Statistics collected since the register was created.
    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Registers a new area and returns its identifier.
    ///
    /// The identifier is the smallest one not currently assigned to a live
    /// area.
    pub fn add_area(&mut self, area: impl Into<Area>) -> Result<AreaId, RegisterError> {
        let area = area.into();
        if area.is_empty() {
            stat!(self.stats, rejected_empty);
            return Err(RegisterError::EmptyArea);
        }
        if let Some(&id) = self.areas.get(&area) {
            stat!(self.stats, rejected_duplicate);
            return Err(RegisterError::AreaExists(id));
        }

        let id = self.next_free_id();
        if self.lookup.last_key_value().is_some_and(|(&last, _)| last > id) {
            stat!(self.stats, gaps_filled);
        }
        trace!("Adding {area} as {id}");

        self.lookup.insert(id, area.clone());
        self.areas.insert(area, id);
        self.num_added += 1;
        stat!(self.stats, areas_added);

        self.check_invariants();
        Ok(id)
    }

    /// Returns the smallest identifier that is not assigned to a live area.
    fn next_free_id(&self) -> AreaId {
        entity::first_unused(self.lookup.keys().copied())
    }

    /// Removes `label` from every area containing it.
    ///
    /// - A standalone area `{label}` is deleted and its identifier freed.
    /// - Any other area shrinks to its residual (the area without `label`).
    ///   If no area with exactly the residual labels exists, the residual
    ///   takes over the identifier of the original area.
    /// - Otherwise the original area merges into the existing residual area:
    ///   its identifier is freed and the `old -> new` pair is reported in the
    ///   returned remap.
    ///
    /// Removing a label that is not part of any area has no effect.
    pub fn remove_region(&mut self, label: &str) -> IdRemap {
        stat!(self.stats, region_removals);

        // First collect all the changes while the maps are untouched, so that
        // residual lookups only ever see the areas as they were before this
        // call.
        let mut remap = IdRemap::new();
        let mut retired = Vec::new();
        let mut residuals = Vec::new();
        let mut standalone = None;
        for (area, &id) in &self.areas {
            let Some(residual) = area.without(label) else {
                continue;
            };
            retired.push(id);

            if residual.is_empty() {
                debug_assert!(
                    standalone.is_none(),
                    "multiple standalone areas for {label}"
                );
                if standalone.is_none() {
                    trace!("Deleting standalone {area} ({id})");
                    stat!(self.stats, standalone_deleted);
                    standalone = Some(id);
                }
                continue;
            }

            if let Some(&existing) = self.areas.get(&residual) {
                trace!("Merging {area} ({id}) into {residual} ({existing})");
                stat!(self.stats, areas_merged);
                remap.insert(id, existing);
            } else {
                trace!("Shrinking {area} ({id}) to {residual}");
                stat!(self.stats, residuals_installed);
                residuals.push((residual, id));
            }
        }

        // Then apply them: drop every matched area, and re-insert residuals
        // under the identifier of the area they came from.
        for id in retired {
            if let Some(area) = self.lookup.remove(&id) {
                self.areas.remove(&area);
            }
        }
        for (residual, id) in residuals {
            self.lookup.insert(id, residual.clone());
            self.areas.insert(residual, id);
        }

        if !remap.is_empty() {
            trace!("Removing {label} remapped {remap}");
        }
        self.check_invariants();
        remap
    }

    /// Looks up the identifier of the area with exactly the given labels.
    #[must_use]
    pub fn find_regions(&self, area: &Area) -> Option<AreaId> {
        self.areas.get(area).copied()
    }

    /// Looks up the area assigned to `id`.
    #[must_use]
    pub fn find_regions_by_id(&self, id: AreaId) -> Option<&Area> {
        self.lookup.get(&id)
    }

    /// Removes all areas and resets the diagnostic counter.
    ///
    /// Entity types are kept.
    pub fn clear(&mut self) {
        trace!("Clearing {} areas", self.areas.len());
        stat!(self.stats, clears);
        self.areas.clear();
        self.lookup.clear();
        self.num_added = 0;
    }

    /// Number of live areas.
    #[must_use]
    pub fn regions_number(&self) -> usize {
        self.areas.len()
    }

    /// Ordinal of the last area added since creation or the last
    /// [`clear`](Self::clear), or `None` if none was added.
    ///
    /// This counts additions only. It is not related to the identifiers that
    /// were assigned and is not adjusted when areas are removed.
    #[must_use]
    pub fn id(&self) -> Option<usize> {
        self.num_added.checked_sub(1)
    }

    /// Iterates over all live areas and their identifiers, in area order.
    pub fn iter(&self) -> impl Iterator<Item = (&Area, AreaId)> {
        self.areas.iter().map(|(area, &id)| (area, id))
    }

    /// All labels that appear in at least one live area.
    ///
    /// Each label is reported once, in the order it is first encountered
    /// when visiting areas in area order.
    #[must_use]
    pub fn instances(&self) -> Vec<String> {
        let mut seen: HashSet<&str, FxBuildHasher> = HashSet::default();
        let mut instances = Vec::new();
        for label in self.areas.keys().flat_map(Area::iter) {
            if seen.insert(label) {
                instances.push(label.to_string());
            }
        }
        instances
    }

    /// Snapshot of all live areas, in area order.
    #[must_use]
    pub fn entries(&self) -> Vec<Area> {
        self.areas.keys().cloned().collect()
    }

    /// Snapshot of the area to identifier mapping.
    #[must_use]
    pub fn areas(&self) -> BTreeMap<Area, AreaId> {
        self.areas.clone()
    }

    /// Identifiers of all areas containing `entity`, in area order.
    #[must_use]
    pub fn entity_ids(&self, entity: &str) -> Vec<AreaId> {
        self.iter()
            .filter(|(area, _)| area.contains(entity))
            .map(|(_, id)| id)
            .collect()
    }

    /// All labels that share at least one area with `entity`, excluding
    /// `entity` itself.
    #[must_use]
    pub fn coexistent_entities(&self, entity: &str) -> BTreeSet<String> {
        self.areas
            .keys()
            .filter(|area| area.contains(entity))
            .flat_map(Area::iter)
            .filter(|&label| label != entity)
            .map(ToString::to_string)
            .collect()
    }

    /// Sets the type of `entity`, replacing any previous one.
    pub fn add_entity_type(&mut self, entity: impl Into<String>, ty: impl Into<String>) {
        stat!(self.stats, entity_types_set);
        self.entity_types.insert(entity.into(), ty.into());
    }

    /// Returns the type of `entity`, if one was set.
    #[must_use]
    pub fn entity_type(&self, entity: &str) -> Option<&str> {
        self.entity_types.get(entity).map(String::as_str)
    }

    /// Logs a listing of all areas at info level.
    pub fn print(&self) {
        for (area, id) in self.iter() {
            log::info!("{}", debug_utils::DisplayArea { id, area });
        }
    }

    fn check_invariants(&self) {
        if self.options.verify_invariants {
            if let Err(err) = debug_utils::validate_register(self) {
                panic!("Register invariants violated: {err}");
            }
        }
    }

    /// Raw access to the reverse index, for validation.
    pub(crate) fn lookup(&self) -> &BTreeMap<AreaId, Area> {
        &self.lookup
    }
}

impl fmt::Display for RegionsRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&DisplayRegister(self), f)
    }
}

impl fmt::Debug for RegionsRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionsRegister")
            .field("options", &self.options)
            .field("areas", &self.areas)
            .field("entity_types", &self.entity_types)
            .field("num_added", &self.num_added)
            .finish_non_exhaustive()
    }
}
