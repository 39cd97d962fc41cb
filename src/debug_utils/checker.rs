//! Checker which replays a script of [`RegisterOp`] on a real register and on
//! a naive reference model, and verifies that both agree after every step.
//!
//! The model stores areas as a flat list of label sets and recomputes
//! everything by brute force, so it is easy to convince oneself that it is
//! correct. It is only meant for the small registers produced by tests and
//! fuzzing.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use anyhow::{Context, Result, ensure};

use super::ops::{OpOutcome, RegisterOp};
use super::validate_register;
use crate::area::{Area, AreaId};
use crate::remap::IdRemap;
use crate::{Options, RegionsRegister, RegisterError};

/// Replays `ops` on a fresh register created with `options`, checking each
/// result and the full register state against the reference model.
pub fn check_ops(options: &Options, ops: &[RegisterOp]) -> Result<()> {
    let mut register = RegionsRegister::with_options(options.clone());
    let mut model = Model::default();
    for (i, op) in ops.iter().enumerate() {
        trace!("Op {i}: {op}");
        let actual = op.apply(&mut register);
        let expected = model.apply(op);
        ensure!(
            actual == expected,
            "Op {i} ({op}): register returned {actual:?}, model expected {expected:?}"
        );
        model
            .compare(&register)
            .with_context(|| alloc::format!("State mismatch after op {i} ({op})"))?;
        validate_register(&register)
            .with_context(|| alloc::format!("Invalid register after op {i} ({op})"))?;
    }
    Ok(())
}

/// Reference model of a register.
#[derive(Default)]
struct Model {
    /// Live areas with their identifiers, in no particular order.
    areas: Vec<(BTreeSet<String>, usize)>,
    entity_types: BTreeMap<String, String>,
    num_added: usize,
}

impl Model {
    fn find(&self, labels: &BTreeSet<String>) -> Option<usize> {
        self.areas
            .iter()
            .find(|(area, _)| area == labels)
            .map(|&(_, id)| id)
    }

    fn apply(&mut self, op: &RegisterOp) -> OpOutcome {
        match op {
            RegisterOp::AddArea(area) => OpOutcome::Added(self.add(labels(area))),
            RegisterOp::RemoveRegion(label) => OpOutcome::Removed(self.remove(label)),
            RegisterOp::FindRegions(area) => {
                OpOutcome::Found(self.find(&labels(area)).map(AreaId::new))
            }
            RegisterOp::FindRegionsById(id) => OpOutcome::FoundArea(
                self.areas
                    .iter()
                    .find(|&&(_, live)| live == id.index())
                    .map(|(area, _)| Area::new(area.iter().cloned())),
            ),
            RegisterOp::EntityIds(entity) => {
                // The register reports identifiers in area order.
                let mut matching: Vec<_> = self
                    .areas
                    .iter()
                    .filter(|(area, _)| area.contains(entity))
                    .map(|(area, id)| (Area::new(area.iter().cloned()), AreaId::new(*id)))
                    .collect();
                matching.sort();
                OpOutcome::Ids(matching.into_iter().map(|(_, id)| id).collect())
            }
            RegisterOp::CoexistentEntities(entity) => {
                let mut coexistent = BTreeSet::new();
                for (area, _) in &self.areas {
                    if area.contains(entity) {
                        coexistent.extend(area.iter().filter(|&l| l != entity).cloned());
                    }
                }
                OpOutcome::Entities(coexistent)
            }
            RegisterOp::AddEntityType { entity, ty } => {
                self.entity_types.insert(entity.clone(), ty.clone());
                OpOutcome::EntityType(Some(ty.clone()))
            }
            RegisterOp::Clear => {
                self.areas.clear();
                self.num_added = 0;
                OpOutcome::Done
            }
        }
    }

    fn add(&mut self, labels: BTreeSet<String>) -> Result<AreaId, RegisterError> {
        if labels.is_empty() {
            return Err(RegisterError::EmptyArea);
        }
        if let Some(id) = self.find(&labels) {
            return Err(RegisterError::AreaExists(AreaId::new(id)));
        }
        let id = (0..)
            .find(|&candidate| self.areas.iter().all(|&(_, id)| id != candidate))
            .unwrap_or_default();
        self.areas.push((labels, id));
        self.num_added += 1;
        Ok(AreaId::new(id))
    }

    fn remove(&mut self, label: &str) -> IdRemap {
        let before = core::mem::take(&mut self.areas);
        let mut remap = IdRemap::new();
        for (area, id) in &before {
            if !area.contains(label) {
                self.areas.push((area.clone(), *id));
                continue;
            }
            let mut residual = area.clone();
            residual.remove(label);
            if residual.is_empty() {
                continue;
            }
            match before.iter().find(|(other, _)| *other == residual) {
                Some(&(_, existing)) => remap.insert(AreaId::new(*id), AreaId::new(existing)),
                None => self.areas.push((residual, *id)),
            }
        }
        remap
    }

    /// Compares the complete observable state of `register` with the model.
    fn compare(&self, register: &RegionsRegister) -> Result<()> {
        let mut expected: Vec<_> = self
            .areas
            .iter()
            .map(|(area, id)| (Area::new(area.iter().cloned()), AreaId::new(*id)))
            .collect();
        expected.sort();
        let actual: Vec<_> = register.areas().into_iter().collect();
        ensure!(
            actual == expected,
            "Register has areas {actual:?}, model expected {expected:?}"
        );

        ensure!(
            register.id() == self.num_added.checked_sub(1),
            "Register counter is {:?}, model expected {:?}",
            register.id(),
            self.num_added.checked_sub(1)
        );

        let instances: BTreeSet<String> = register.instances().into_iter().collect();
        let expected_instances: BTreeSet<String> = self
            .areas
            .iter()
            .flat_map(|(area, _)| area.iter().cloned())
            .collect();
        ensure!(
            instances == expected_instances,
            "Register has instances {instances:?}, model expected {expected_instances:?}"
        );
        ensure!(
            register.instances().len() == instances.len(),
            "Register reported duplicate instances"
        );

        for (entity, ty) in &self.entity_types {
            ensure!(
                register.entity_type(entity) == Some(ty.as_str()),
                "Entity {entity} has type {:?}, model expected {ty:?}",
                register.entity_type(entity)
            );
        }
        Ok(())
    }
}

fn labels(area: &Area) -> BTreeSet<String> {
    area.iter().map(String::from).collect()
}
