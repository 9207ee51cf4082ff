//! The benchmarked submission techniques. Each is a plain struct wired into
//! the shared run harness through the `Test` trait; the geometry-driven ones
//! share a `GeometrySource` bundle and the helpers below.

pub mod compiled_array;
pub mod display_list;
pub mod immediate;
pub mod pixels;
pub mod texture_upload;
pub mod vertex_array;
pub mod vertex_buffer;

pub use self::compiled_array::CompiledVertexArrayTest;
pub use self::display_list::DisplayListTest;
pub use self::immediate::ImmediateTest;
pub use self::pixels::{CopyPixelTest, DrawPixelTest, ReadPixelTest};
pub use self::texture_upload::TextureUploadTest;
pub use self::vertex_array::{IndexedArrayTest, VertexArrayTest};
pub use self::vertex_buffer::VertexBufferObjectTest;

use gl;
use gl::types::*;
use geometry::{Attribs, GeometrySource, COLOR_OFFSET, NORMAL_OFFSET, POSITION_OFFSET,
               TEXCOORD_OFFSET, VERTEX_STRIDE};
use result::{ResultDesc, ResultSet};

pub static GEOMETRY_DESCS: &[ResultDesc] = &[
    ResultDesc::new("TriangleRate", "tri/s"),
    ResultDesc::new("VertexRate", "vertex/s"),
    ResultDesc::new("DataRate", "byte/s"),
];

/// Books one batch worth of submitted work into a geometry ResultSet.
pub fn accumulate(results: &mut ResultSet, geo: &GeometrySource) {
    let triangles = geo.triangles().len() as f64;
    results[0] += triangles;
    results[1] += triangles * 3.0;
    results[2] += triangles * 3.0 * geo.vertex_size() as f64;
}

/// Issues the batch vertex-by-vertex, the way both the immediate technique
/// and display-list compilation feed the pipeline.
pub unsafe fn submit_immediate(geo: &GeometrySource) {
    let attribs = geo.attribs();
    gl::Begin(gl::TRIANGLES);
    for triangle in geo.triangles() {
        for vertex in &triangle.vertices {
            if attribs.contains(Attribs::COLOR) {
                gl::Color3fv(vertex.color.as_ptr());
            }
            if attribs.contains(Attribs::NORMAL) {
                gl::Normal3fv(vertex.normal.as_ptr());
            }
            if attribs.contains(Attribs::TEXCOORD) {
                gl::TexCoord2fv(vertex.texcoord.as_ptr());
            }
            gl::Vertex3fv(vertex.position.as_ptr());
        }
    }
    gl::End();
}

/// Sets up interleaved array pointers for the enabled attribute set. `base`
/// is the address of the first vertex, or 0 when a buffer object is bound.
pub unsafe fn enable_arrays(geo: &GeometrySource, base: usize) {
    let attribs = geo.attribs();
    let stride = VERTEX_STRIDE as GLsizei;

    gl::EnableClientState(gl::VERTEX_ARRAY);
    gl::VertexPointer(3, gl::FLOAT, stride, (base + POSITION_OFFSET) as *const GLvoid);

    if attribs.contains(Attribs::COLOR) {
        gl::EnableClientState(gl::COLOR_ARRAY);
        gl::ColorPointer(3, gl::FLOAT, stride, (base + COLOR_OFFSET) as *const GLvoid);
    }
    if attribs.contains(Attribs::NORMAL) {
        gl::EnableClientState(gl::NORMAL_ARRAY);
        gl::NormalPointer(gl::FLOAT, stride, (base + NORMAL_OFFSET) as *const GLvoid);
    }
    if attribs.contains(Attribs::TEXCOORD) {
        gl::EnableClientState(gl::TEXTURE_COORD_ARRAY);
        gl::TexCoordPointer(2, gl::FLOAT, stride, (base + TEXCOORD_OFFSET) as *const GLvoid);
    }
}

pub unsafe fn disable_arrays() {
    gl::DisableClientState(gl::VERTEX_ARRAY);
    gl::DisableClientState(gl::COLOR_ARRAY);
    gl::DisableClientState(gl::NORMAL_ARRAY);
    gl::DisableClientState(gl::TEXTURE_COORD_ARRAY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use geometry::{GeometrySource, SmallTriangles, Zeroes};
    use result::ResultSet;
    use test::Test;

    #[test]
    fn accumulate_books_triangles_vertices_and_bytes() {
        let mut source = GeometrySource::new(Rc::new(Zeroes));
        source.apply_property("BatchSize", 10);
        source.regenerate();

        let mut results = ResultSet::new(GEOMETRY_DESCS.len());
        accumulate(&mut results, &source);
        accumulate(&mut results, &source);
        assert_eq!(results[0], 20.0);
        assert_eq!(results[1], 60.0);
        assert_eq!(results[2], 60.0 * 12.0);
    }

    #[test]
    fn accumulate_counts_color_bytes_when_present() {
        let mut source = GeometrySource::new(Rc::new(SmallTriangles::new(64.0, 64.0)));
        source.apply_property("BatchSize", 4);
        source.regenerate();

        let mut results = ResultSet::new(GEOMETRY_DESCS.len());
        accumulate(&mut results, &source);
        assert_eq!(results[2], 4.0 * 3.0 * 24.0);
    }

    #[test]
    fn geometry_tests_accept_the_batch_size_property() {
        let mut test = ImmediateTest::new(GeometrySource::new(Rc::new(Zeroes)));
        test.set_property("BatchSize", 64).unwrap();
        assert!(test.set_property("Bogus", 1).is_err());
        assert_eq!(test.name(), "Immediate");
        assert_eq!(test.descs().len(), 3);
    }
}
