use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use arbitrary::{Arbitrary, Result, Unstructured};

use super::ops::RegisterOp;
use crate::area::{Area, AreaId};

/// Configuration options for [`arbitrary_ops_with_config`].
///
/// These are ranges from which a value is arbitrarily chosen when generating a
/// script.
///
/// It's generally fine to just use `Default::default` for this.
#[derive(Debug, Clone)]
pub struct ArbitraryOpsConfig {
    /// Number of operations in the script.
    pub num_ops: RangeInclusive<usize>,

    /// Number of distinct region labels used by the script.
    ///
    /// A small pool makes overlapping areas, and therefore splits and merges
    /// on removal, much more likely.
    pub num_labels: RangeInclusive<usize>,

    /// Number of labels drawn for each area. Duplicate draws collapse, so
    /// areas may end up smaller than this.
    pub labels_per_area: RangeInclusive<usize>,

    /// Number of distinct entity types.
    pub num_types: RangeInclusive<usize>,
}

impl Default for ArbitraryOpsConfig {
    fn default() -> Self {
        Self {
            num_ops: 0..=64,
            num_labels: 1..=8,
            labels_per_area: 1..=4,
            num_types: 1..=3,
        }
    }
}

/// Constructs a randomly-generated script of register operations.
pub fn arbitrary_ops_with_config(
    u: &mut Unstructured<'_>,
    config: ArbitraryOpsConfig,
) -> Result<Vec<RegisterOp>> {
    let mut builder = OpsBuilder {
        num_labels: u.int_in_range(config.num_labels.clone())?.max(1),
        num_types: u.int_in_range(config.num_types.clone())?.max(1),
        config,
        u,
    };
    let num_ops = builder.u.int_in_range(builder.config.num_ops.clone())?;
    let mut ops = Vec::with_capacity(num_ops);
    for _ in 0..num_ops {
        ops.push(builder.gen_op()?);
    }
    Ok(ops)
}

struct OpsBuilder<'a, 'b> {
    /// Source of randomness.
    u: &'a mut Unstructured<'b>,

    /// Configuration options
    config: ArbitraryOpsConfig,

    num_labels: usize,
    num_types: usize,
}

impl OpsBuilder<'_, '_> {
    fn label(&mut self) -> Result<String> {
        let index = self.u.choose_index(self.num_labels)?;
        Ok(format!("r{index}"))
    }

    fn area(&mut self) -> Result<Area> {
        // Occasionally produce an empty area to exercise rejection.
        if self.u.ratio(1, 32)? {
            return Ok(Area::default());
        }
        let len = self.u.int_in_range(self.config.labels_per_area.clone())?;
        let mut labels = Vec::with_capacity(len);
        for _ in 0..len.max(1) {
            labels.push(self.label()?);
        }
        Ok(Area::new(labels))
    }

    fn gen_op(&mut self) -> Result<RegisterOp> {
        // Adds dominate so that the register actually fills up.
        Ok(match self.u.int_in_range(0..=99)? {
            0..=44 => RegisterOp::AddArea(self.area()?),
            45..=64 => RegisterOp::RemoveRegion(self.label()?),
            65..=74 => RegisterOp::FindRegions(self.area()?),
            75..=82 => RegisterOp::FindRegionsById(AreaId::new(self.u.int_in_range(0..=16)?)),
            83..=87 => RegisterOp::EntityIds(self.label()?),
            88..=92 => RegisterOp::CoexistentEntities(self.label()?),
            93..=97 => {
                let entity = self.label()?;
                let ty = format!("type{}", self.u.choose_index(self.num_types)?);
                RegisterOp::AddEntityType { entity, ty }
            }
            _ => RegisterOp::Clear,
        })
    }
}

impl<'a> Arbitrary<'a> for RegisterOp {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let config = ArbitraryOpsConfig::default();
        let mut builder = OpsBuilder {
            num_labels: *config.num_labels.end(),
            num_types: *config.num_types.end(),
            config,
            u,
        };
        builder.gen_op()
    }
}
