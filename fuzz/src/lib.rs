use std::fmt;

use arbitrary::{Arbitrary, Result, Unstructured};
use regions_register::Options;
use regions_register::debug_utils::{self, RegisterOp};

/// Common implementation of a test case used by all fuzz targets.
pub struct TestCase {
    pub options: Options,
    pub ops: Vec<RegisterOp>,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        let options = u.arbitrary()?;
        let ops = debug_utils::arbitrary_ops_with_config(u, Default::default())?;
        Ok(TestCase { options, ops })
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:?}", self.options)?;
        for op in &self.ops {
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}
