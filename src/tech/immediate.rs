use anyhow::Result;

use geometry::GeometrySource;
use result::{ResultDesc, ResultSet};
use state::StateSet;
use tech::{accumulate, submit_immediate, GEOMETRY_DESCS};
use test::Test;

/// glBegin/glEnd issuance, one call per vertex attribute.
pub struct ImmediateTest {
    geo: GeometrySource,
}

impl ImmediateTest {
    pub fn new(geo: GeometrySource) -> ImmediateTest {
        ImmediateTest { geo: geo }
    }
}

impl Test for ImmediateTest {
    fn name(&self) -> &str {
        "Immediate"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        GEOMETRY_DESCS
    }

    fn state_set(&self) -> Option<&StateSet> {
        self.geo.state_set()
    }

    fn transform(&self) -> Option<&[f32; 16]> {
        self.geo.transform()
    }

    fn set_property(&mut self, key: &str, value: u64) -> Result<()> {
        if self.geo.apply_property(key, value) {
            Ok(())
        } else {
            Err(anyhow!("Immediate: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            submit_immediate(&self.geo);
        }
        accumulate(results, &self.geo);
        Ok(())
    }
}
