use anyhow::Result;

use gl;
use gl::types::*;
use geometry::GeometrySource;
use result::{ResultDesc, ResultSet};
use state::StateSet;
use tech::{accumulate, disable_arrays, enable_arrays, GEOMETRY_DESCS};
use test::Test;

/// Client-side interleaved vertex arrays drawn with glDrawArrays.
pub struct VertexArrayTest {
    geo: GeometrySource,
}

impl VertexArrayTest {
    pub fn new(geo: GeometrySource) -> VertexArrayTest {
        VertexArrayTest { geo: geo }
    }
}

impl Test for VertexArrayTest {
    fn name(&self) -> &str {
        "Vertex Array"
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
            Err(anyhow!("Vertex Array: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        unsafe {
            enable_arrays(&self.geo, self.geo.triangles().as_ptr() as usize);
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
        }
        Ok(())
    }
}

/// The same arrays drawn through sequential indices with glDrawElements,
/// exposing the post-transform vertex cache.
pub struct IndexedArrayTest {
    geo: GeometrySource,
    indices: Vec<GLuint>,
}

impl IndexedArrayTest {
    pub fn new(geo: GeometrySource) -> IndexedArrayTest {
        IndexedArrayTest {
            geo: geo,
            indices: Vec::new(),
        }
    }
}

impl Test for IndexedArrayTest {
    fn name(&self) -> &str {
        "Indexed Vertex Array"
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
            Err(anyhow!("Indexed Vertex Array: unknown property '{}'", key))
        }
    }

    fn setup(&mut self) -> Result<()> {
        self.geo.regenerate();
        self.indices = (0..self.geo.vertex_count() as GLuint).collect();
        unsafe {
            enable_arrays(&self.geo, self.geo.triangles().as_ptr() as usize);
        }
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.indices.len() as GLsizei,
                gl::UNSIGNED_INT,
                self.indices.as_ptr() as *const GLvoid,
            );
        }
        accumulate(results, &self.geo);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        unsafe {
            disable_arrays();
        }
        Ok(())
    }
}
