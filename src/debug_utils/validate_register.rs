//! Register invariant validation.

use anyhow::{Result, bail, ensure};

use crate::RegionsRegister;

/// Checks that the internal state of `register` is consistent:
///
/// - the forward map and the reverse index describe the same one-to-one
///   relation between areas and identifiers,
/// - every stored area is non-empty and in canonical (sorted, deduplicated)
///   form,
/// - the diagnostic counter has seen at least as many additions as there are
///   live areas.
pub fn validate_register(register: &RegionsRegister) -> Result<()> {
    let lookup = register.lookup();
    ensure!(
        register.regions_number() == lookup.len(),
        "Forward map has {} areas but reverse index has {}",
        register.regions_number(),
        lookup.len()
    );

    for (area, id) in register.iter() {
        ensure!(!area.is_empty(), "{id}: Empty area");
        ensure!(
            area.labels().windows(2).all(|w| w[0] < w[1]),
            "{id}: Area {area} is not in canonical form"
        );
        match lookup.get(&id) {
            Some(other) => ensure!(
                other == area,
                "{id}: Forward map has {area} but reverse index has {other}"
            ),
            None => bail!("{id}: {area} is missing from the reverse index"),
        }
    }

    let num_added = register.id().map_or(0, |ordinal| ordinal + 1);
    ensure!(
        register.regions_number() <= num_added,
        "{} live areas but only {num_added} additions",
        register.regions_number()
    );

    Ok(())
}
