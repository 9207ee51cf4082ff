use anyhow::Result;

use gl;
use gl::types::*;
use geometry::GeometrySource;
use result::{ResultDesc, ResultSet};
use state::StateSet;
use tech::{accumulate, submit_immediate, GEOMETRY_DESCS};
use test::Test;

/// The immediate-mode stream compiled once into a display list in `setup`,
/// then replayed per iteration.
pub struct DisplayListTest {
    geo: GeometrySource,
    list: GLuint,
}

impl DisplayListTest {
    pub fn new(geo: GeometrySource) -> DisplayListTest {
        DisplayListTest { geo: geo, list: 0 }
    }
}

impl Test for DisplayListTest {
    fn name(&self) -> &str {
        "Display List"
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
            Err(anyhow!("Display List: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        unsafe {
            self.list = gl::GenLists(1);
            if self.list == 0 {
                bail!("glGenLists returned no list");
            }
            gl::NewList(self.list, gl::COMPILE);
            submit_immediate(&self.geo);
            gl::EndList();
            debug_assert_eq!(gl::GetError(), 0);
        }
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::CallList(self.list);
        }
        accumulate(results, &self.geo);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        unsafe {
            gl::DeleteLists(self.list, 1);
        }
        self.list = 0;
        Ok(())
    }
}
