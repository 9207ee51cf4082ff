use anyhow::Result;

use gl;
use gl::types::*;
use geometry::GeometrySource;
use glutil;
use result::{ResultDesc, ResultSet};
use state::StateSet;
use tech::{accumulate, disable_arrays, enable_arrays, GEOMETRY_DESCS};
use test::Test;

/// Vertex arrays locked with GL_EXT_compiled_vertex_array, letting the
/// driver transform each vertex once for the whole run.
pub struct CompiledVertexArrayTest {
    geo: GeometrySource,
}

impl CompiledVertexArrayTest {
    pub fn new(geo: GeometrySource) -> CompiledVertexArrayTest {
        CompiledVertexArrayTest { geo: geo }
    }
}

impl Test for CompiledVertexArrayTest {
    fn name(&self) -> &str {
        "Compiled Vertex Array"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        GEOMETRY_DESCS
    }

    fn supported(&self) -> bool {
        glutil::has_extension("GL_EXT_compiled_vertex_array")
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
            Err(anyhow!("Compiled Vertex Array: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        unsafe {
            enable_arrays(&self.geo, self.geo.triangles().as_ptr() as usize);
            gl::LockArraysEXT(0, self.geo.vertex_count() as GLsizei);
            debug_assert_eq!(gl::GetError(), 0);
        }
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::DrawArrays(gl::TRIANGLES, 0, self.geo.vertex_count() as GLsizei);
        }
        accumulate(results, &self.geo);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        unsafe {
            gl::UnlockArraysEXT();
            disable_arrays();
        }
        Ok(())
    }
}
