//! Triangle soup generation and the per-test geometry bundle shared by the
//! submission techniques.

use std::mem;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use state::StateSet;

bitflags! {
    /// Optional per-vertex attributes a generator fills in and a technique
    /// submits. Position is always present.
    pub struct Attribs: u32 {
        const COLOR = 1;
        const NORMAL = 2;
        const TEXCOORD = 4;
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

// Interleaved-array layout, relied on by the pointer-based techniques.
pub const POSITION_OFFSET: usize = 0;
pub const COLOR_OFFSET: usize = 12;
pub const NORMAL_OFFSET: usize = 24;
pub const TEXCOORD_OFFSET: usize = 36;
pub const VERTEX_STRIDE: usize = mem::size_of::<Vertex>();

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

/// Fills a triangle buffer for a requested batch size. Generators are
/// deterministic so every technique draws identical geometry.
pub trait GeometryGenerator {
    fn attribs(&self) -> Attribs {
        Attribs::empty()
    }

    fn generate(&self, out: &mut Vec<Triangle>, triangle_count: usize);
}

/// All-zero vertices: degenerate triangles that rasterize nothing, so the
/// measurement isolates submission overhead.
pub struct Zeroes;

impl GeometryGenerator for Zeroes {
    fn generate(&self, out: &mut Vec<Triangle>, triangle_count: usize) {
        out.clear();
        out.resize(triangle_count, Triangle::default());
    }
}

/// Small colored screen-space triangles scattered over a viewport rectangle.
pub struct SmallTriangles {
    width: f32,
    height: f32,
    size: f32,
}

impl SmallTriangles {
    pub fn new(width: f32, height: f32) -> SmallTriangles {
        SmallTriangles {
            width: width,
            height: height,
            size: 4.0,
        }
    }
}

impl GeometryGenerator for SmallTriangles {
    fn attribs(&self) -> Attribs {
        Attribs::COLOR
    }

    fn generate(&self, out: &mut Vec<Triangle>, triangle_count: usize) {
        // Fixed seed: regeneration at a given batch size always produces the
        // same layout, so techniques compete on identical input.
        let mut rng = StdRng::seed_from_u64(0x6c5_0be);
        out.clear();
        out.reserve(triangle_count);
        for _ in 0..triangle_count {
            let anchor_x = rng.random_range(0.0..self.width - self.size);
            let anchor_y = rng.random_range(0.0..self.height - self.size);
            let mut triangle = Triangle::default();
            for vertex in &mut triangle.vertices {
                vertex.position = [
                    anchor_x + rng.random_range(0.0..self.size),
                    anchor_y + rng.random_range(0.0..self.size),
                    0.0,
                ];
                vertex.color = [
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                ];
            }
            out.push(triangle);
        }
    }
}

/// Per-test bundle: the shared generator, the current batch size, the
/// regenerated triangle buffer, and the optional render state and transform
/// attached to the owning test.
pub struct GeometrySource {
    generator: Rc<dyn GeometryGenerator>,
    batch_size: usize,
    triangles: Vec<Triangle>,
    state: Option<StateSet>,
    transform: Option<[f32; 16]>,
}

impl GeometrySource {
    pub fn new(generator: Rc<dyn GeometryGenerator>) -> GeometrySource {
        GeometrySource {
            generator: generator,
            batch_size: 1,
            triangles: Vec::new(),
            state: None,
            transform: None,
        }
    }

    pub fn with_state(mut self, state: StateSet) -> GeometrySource {
        self.state = Some(state);
        self
    }

    pub fn with_transform(mut self, transform: [f32; 16]) -> GeometrySource {
        self.transform = Some(transform);
        self
    }

    pub fn state_set(&self) -> Option<&StateSet> {
        self.state.as_ref()
    }

    pub fn transform(&self) -> Option<&[f32; 16]> {
        self.transform.as_ref()
    }

    /// Handles the shared geometry properties; returns false for keys the
    /// caller should reject.
    pub fn apply_property(&mut self, key: &str, value: u64) -> bool {
        match key {
            "BatchSize" => {
                self.batch_size = value as usize;
                true
            }
            _ => false,
        }
    }

    /// Refills the triangle buffer for the current batch size. Called from
    /// `setup` so the buffer's address stays stable for the whole run.
    pub fn regenerate(&mut self) {
        let count = self.batch_size;
        self.generator.generate(&mut self.triangles, count);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn attribs(&self) -> Attribs {
        self.generator.attribs()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Bytes actually submitted per vertex for the enabled attribute set.
    pub fn vertex_size(&self) -> usize {
        let attribs = self.attribs();
        let mut size = 12;
        if attribs.contains(Attribs::COLOR) {
            size += 12;
        }
        if attribs.contains(Attribs::NORMAL) {
            size += 12;
        }
        if attribs.contains(Attribs::TEXCOORD) {
            size += 8;
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn vertex_layout_matches_the_pointer_offsets() {
        let vertex = Vertex::default();
        let base = &vertex as *const Vertex as usize;
        assert_eq!(&vertex.color as *const _ as usize - base, COLOR_OFFSET);
        assert_eq!(&vertex.normal as *const _ as usize - base, NORMAL_OFFSET);
        assert_eq!(&vertex.texcoord as *const _ as usize - base, TEXCOORD_OFFSET);
        assert_eq!(VERTEX_STRIDE, 44);
    }

    #[test]
    fn zeroes_yields_degenerate_triangles() {
        let mut out = Vec::new();
        Zeroes.generate(&mut out, 16);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|t| *t == Triangle::default()));
    }

    #[test]
    fn small_triangles_are_deterministic() {
        let gen = SmallTriangles::new(640.0, 480.0);
        let mut a = Vec::new();
        let mut b = Vec::new();
        gen.generate(&mut a, 32);
        gen.generate(&mut b, 32);
        assert_eq!(a, b);
    }

    #[test]
    fn small_triangles_stay_inside_the_viewport() {
        let gen = SmallTriangles::new(640.0, 480.0);
        let mut out = Vec::new();
        gen.generate(&mut out, 64);
        assert_eq!(out.len(), 64);
        for triangle in &out {
            for vertex in &triangle.vertices {
                assert!(vertex.position[0] >= 0.0 && vertex.position[0] <= 640.0);
                assert!(vertex.position[1] >= 0.0 && vertex.position[1] <= 480.0);
            }
        }
    }

    #[test]
    fn source_regenerates_at_the_configured_batch_size() {
        let mut source = GeometrySource::new(Rc::new(Zeroes));
        assert!(source.apply_property("BatchSize", 8));
        source.regenerate();
        assert_eq!(source.triangles().len(), 8);
        assert_eq!(source.vertex_count(), 24);

        assert!(!source.apply_property("Width", 8));
    }

    #[test]
    fn vertex_size_counts_enabled_attributes() {
        let plain = GeometrySource::new(Rc::new(Zeroes));
        assert_eq!(plain.vertex_size(), 12);

        let colored = GeometrySource::new(Rc::new(SmallTriangles::new(64.0, 64.0)));
        assert_eq!(colored.vertex_size(), 24);
    }
}
