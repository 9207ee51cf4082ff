use std::mem;

use anyhow::Result;

use gl;
use gl::types::*;
use geometry::{GeometrySource, Triangle};
use glutil;
use result::{ResultDesc, ResultSet};
use state::StateSet;
use tech::{accumulate, disable_arrays, enable_arrays, GEOMETRY_DESCS};
use test::Test;

/// The batch uploaded once into a STATIC_DRAW buffer object in `setup`,
/// then drawn from server memory with offset pointers.
pub struct VertexBufferObjectTest {
    geo: GeometrySource,
    buffer: GLuint,
}

impl VertexBufferObjectTest {
    pub fn new(geo: GeometrySource) -> VertexBufferObjectTest {
        VertexBufferObjectTest { geo: geo, buffer: 0 }
    }
}

impl Test for VertexBufferObjectTest {
    fn name(&self) -> &str {
        "Vertex Buffer Object"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        GEOMETRY_DESCS
    }

    fn supported(&self) -> bool {
        glutil::has_extension("GL_ARB_vertex_buffer_object")
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
            Err(anyhow!("Vertex Buffer Object: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        let triangles = self.geo.triangles();
        unsafe {
            gl::GenBuffersARB(1, &mut self.buffer);
            gl::BindBufferARB(gl::ARRAY_BUFFER_ARB, self.buffer);
            gl::BufferDataARB(
                gl::ARRAY_BUFFER_ARB,
                (triangles.len() * mem::size_of::<Triangle>()) as GLsizeiptrARB,
                triangles.as_ptr() as *const GLvoid,
                gl::STATIC_DRAW_ARB,
            );
            // With a bound buffer the pointers become byte offsets.
            enable_arrays(&self.geo, 0);
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
            disable_arrays();
            gl::BindBufferARB(gl::ARRAY_BUFFER_ARB, 0);
            gl::DeleteBuffersARB(1, &self.buffer);
        }
        self.buffer = 0;
        Ok(())
    }
}
