//! Checks that `SharedRegionsRegister` produces the same results as a plain
//! register, including when operations are grouped with `atomically`.

#![no_main]

use arbitrary::{Arbitrary, Result, Unstructured};
use libfuzzer_sys::fuzz_target;
use regions_register::debug_utils::{self, RegisterOp};
use regions_register::{Options, RegionsRegister, SharedRegionsRegister};

#[derive(Debug)]
struct TestCase {
    /// Operations, split into groups which each run in one critical section.
    groups: Vec<Vec<RegisterOp>>,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        let ops = debug_utils::arbitrary_ops_with_config(u, Default::default())?;
        let mut groups = vec![];
        let mut rest = &ops[..];
        while !rest.is_empty() {
            let len = u.int_in_range(1..=rest.len())?;
            groups.push(rest[..len].to_vec());
            rest = &rest[len..];
        }
        Ok(TestCase { groups })
    }
}

fuzz_target!(|t: TestCase| {
    let options = Options {
        threaded: true,
        verify_invariants: true,
    };
    let mut plain = RegionsRegister::with_options(options.clone());
    let shared = SharedRegionsRegister::with_options(options);

    for group in &t.groups {
        let outcomes = shared.atomically(|shared| {
            group
                .iter()
                .map(|op| op.apply_shared(shared))
                .collect::<Vec<_>>()
        });
        for (op, outcome) in group.iter().zip(outcomes) {
            log::trace!("{op}: {outcome:?}");
            assert_eq!(op.apply(&mut plain), outcome, "{op}");
        }
    }

    assert_eq!(shared.areas(), plain.areas());
    shared.with(|register| debug_utils::validate_register(register).unwrap());
});
