//! Scripted register operations.
//!
//! A script is a list of [`RegisterOp`] which can be replayed against a
//! register, printed, or generated randomly (with the `arbitrary` feature).

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use super::display::display_iter;
use crate::area::{Area, AreaId};
use crate::remap::IdRemap;
use crate::{RegionsRegister, RegisterError};

/// A single operation on a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOp {
    /// [`RegionsRegister::add_area`]
    AddArea(Area),

    /// [`RegionsRegister::remove_region`]
    RemoveRegion(String),

    /// [`RegionsRegister::find_regions`]
    FindRegions(Area),

    /// [`RegionsRegister::find_regions_by_id`]
    FindRegionsById(AreaId),

    /// [`RegionsRegister::entity_ids`]
    EntityIds(String),

    /// [`RegionsRegister::coexistent_entities`]
    CoexistentEntities(String),

    /// [`RegionsRegister::add_entity_type`] followed by
    /// [`RegionsRegister::entity_type`] to read it back.
    AddEntityType {
        /// Entity label.
        entity: String,

        /// Type assigned to the entity.
        ty: String,
    },

    /// [`RegionsRegister::clear`]
    Clear,
}

/// Result of applying a [`RegisterOp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// Result of an `AddArea`.
    Added(Result<AreaId, RegisterError>),

    /// Remap returned by a `RemoveRegion`.
    Removed(IdRemap),

    /// Result of a `FindRegions`.
    Found(Option<AreaId>),

    /// Result of a `FindRegionsById`.
    FoundArea(Option<Area>),

    /// Result of an `EntityIds`.
    Ids(Vec<AreaId>),

    /// Result of a `CoexistentEntities`.
    Entities(BTreeSet<String>),

    /// Type read back after an `AddEntityType`.
    EntityType(Option<String>),

    /// Operation without a result.
    Done,
}

impl RegisterOp {
    /// Applies this operation to `register`.
    pub fn apply(&self, register: &mut RegionsRegister) -> OpOutcome {
        match self {
            RegisterOp::AddArea(area) => OpOutcome::Added(register.add_area(area.clone())),
            RegisterOp::RemoveRegion(label) => OpOutcome::Removed(register.remove_region(label)),
            RegisterOp::FindRegions(area) => OpOutcome::Found(register.find_regions(area)),
            RegisterOp::FindRegionsById(id) => {
                OpOutcome::FoundArea(register.find_regions_by_id(*id).cloned())
            }
            RegisterOp::EntityIds(entity) => OpOutcome::Ids(register.entity_ids(entity)),
            RegisterOp::CoexistentEntities(entity) => {
                OpOutcome::Entities(register.coexistent_entities(entity))
            }
            RegisterOp::AddEntityType { entity, ty } => {
                register.add_entity_type(entity.as_str(), ty.as_str());
                OpOutcome::EntityType(register.entity_type(entity).map(ToString::to_string))
            }
            RegisterOp::Clear => {
                register.clear();
                OpOutcome::Done
            }
        }
    }

    /// Applies this operation to a shared register.
    ///
    /// `AddEntityType` writes and reads back the type while holding the lock,
    /// so that the outcome matches [`apply`](Self::apply) even when other
    /// threads use the same register.
    #[cfg(feature = "sync")]
    pub fn apply_shared(&self, register: &crate::SharedRegionsRegister) -> OpOutcome {
        match self {
            RegisterOp::AddArea(area) => OpOutcome::Added(register.add_area(area.clone())),
            RegisterOp::RemoveRegion(label) => OpOutcome::Removed(register.remove_region(label)),
            RegisterOp::FindRegions(area) => OpOutcome::Found(register.find_regions(area)),
            RegisterOp::FindRegionsById(id) => {
                OpOutcome::FoundArea(register.find_regions_by_id(*id))
            }
            RegisterOp::EntityIds(entity) => OpOutcome::Ids(register.entity_ids(entity)),
            RegisterOp::CoexistentEntities(entity) => {
                OpOutcome::Entities(register.coexistent_entities(entity))
            }
            RegisterOp::AddEntityType { entity, ty } => register.atomically(|register| {
                register.add_entity_type(entity.as_str(), ty.as_str());
                OpOutcome::EntityType(register.entity_type(entity))
            }),
            RegisterOp::Clear => {
                register.clear();
                OpOutcome::Done
            }
        }
    }
}

impl fmt::Display for RegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterOp::AddArea(area) => write!(f, "add {}", display_iter(area.iter(), " ")),
            RegisterOp::RemoveRegion(label) => write!(f, "remove {label}"),
            RegisterOp::FindRegions(area) => write!(f, "find {}", display_iter(area.iter(), " ")),
            RegisterOp::FindRegionsById(id) => write!(f, "find_id {}", id.index()),
            RegisterOp::EntityIds(entity) => write!(f, "entity_ids {entity}"),
            RegisterOp::CoexistentEntities(entity) => write!(f, "coexistent {entity}"),
            RegisterOp::AddEntityType { entity, ty } => write!(f, "type {entity} = {ty}"),
            RegisterOp::Clear => write!(f, "clear"),
        }
    }
}
