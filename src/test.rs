use anyhow::{Error, Result};

use result::{ResultDesc, ResultSet};
use state::StateSet;

/// A side-effecting hook executed, in registration order, before every
/// `iterate` call inside the timed loop.
pub trait Action {
    fn execute(&mut self);
}

/// What came out of one `Runner::run` invocation.
///
/// `Unsupported` is an expected, reportable-as-zero outcome; `Failed` means
/// the context is in an unknown condition and the sweep must stop.
pub enum RunOutcome {
    Completed(ResultSet),
    Unsupported,
    Failed(Error),
}

/// One benchmarked submission technique.
///
/// Implementations are plain structs; the shared run lifecycle lives in the
/// runner, which guarantees `teardown` executes on every exit path.
pub trait Test {
    fn name(&self) -> &str;

    /// Schema of the `ResultSet` handed to `iterate`.
    fn descs(&self) -> &'static [ResultDesc];

    /// Capability check, consulted before any lifecycle hook runs.
    fn supported(&self) -> bool {
        true
    }

    /// Render state this test wants applied around its run.
    fn state_set(&self) -> Option<&StateSet> {
        None
    }

    /// Modelview matrix loaded around the run, if any.
    fn transform(&self) -> Option<&[f32; 16]> {
        None
    }

    /// String-keyed configuration used by the sweep driver to apply the
    /// independent variable without knowing the concrete type.
    fn set_property(&mut self, key: &str, _value: u64) -> Result<()> {
        Err(anyhow!("{}: unknown property '{}'", self.name(), key))
    }

    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// Performs one unit of benchmarked work and accumulates counts.
    fn iterate(&mut self, results: &mut ResultSet) -> Result<()>;

    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}
