//! Checks that the register agrees with the reference model on arbitrary
//! operation scripts.

#![no_main]

use libfuzzer_sys::fuzz_target;
use regions_register::debug_utils;
use regions_register_fuzz::TestCase;

fuzz_target!(|t: TestCase| {
    log::trace!("Test case:\n{t:?}");
    debug_utils::check_ops(&t.options, &t.ops).unwrap();
});
