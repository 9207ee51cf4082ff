//! OpenGL submission-path throughput benchmark.
//!
//! Sweeps a set of submission techniques (immediate mode, display lists,
//! client arrays, compiled arrays, buffer objects, pixel transfers, texture
//! uploads) over batch sizes and render state, writing one tabular `.data`
//! file per sweep: one line per sampled value, one column per technique.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate bitflags;
extern crate env_logger;
extern crate glutin;
#[macro_use]
extern crate log;
extern crate once_cell;
extern crate rand;

mod geometry;
mod gl;
mod glutil;
mod range;
mod result;
mod runner;
mod state;
mod surface;
mod tech;
mod test;
mod timer;

use std::fs::File;
use std::process;
use std::rc::Rc;

use anyhow::{Context, Result};

use geometry::{GeometryGenerator, GeometrySource, SmallTriangles, Zeroes};
use gl::types::*;
use range::PowerRange;
use runner::Runner;
use state::{DepthState, LightingState, State, StateSet};
use surface::{GlutinSurface, Surface};
use tech::{CompiledVertexArrayTest, CopyPixelTest, DisplayListTest, DrawPixelTest,
           ImmediateTest, IndexedArrayTest, ReadPixelTest, TextureUploadTest,
           VertexArrayTest, VertexBufferObjectTest};
use test::Test;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn set_projection(width: u32, height: u32) {
    unsafe {
        gl::MatrixMode(gl::PROJECTION);
        gl::LoadIdentity();
        gl::Ortho(
            0.0,
            GLdouble::from(width),
            GLdouble::from(height),
            0.0,
            -1.0,
            1.0,
        );
        gl::MatrixMode(gl::MODELVIEW);
        gl::LoadIdentity();
    }
}

fn create_output(filename: &str) -> Result<File> {
    File::create(filename).with_context(|| format!("could not open {}", filename))
}

fn depth_tested() -> StateSet {
    let mut set = StateSet::new();
    set.set(State::Depth(DepthState {
        test: true,
        ..DepthState::default()
    }));
    set
}

/// The five batch-submission techniques over a power-of-two batch-size
/// sweep, all drawing the same generator's output under depth testing.
fn batch_sweep(
    runner: &mut Runner,
    filename: &str,
    generator: Rc<dyn GeometryGenerator>,
    transform: [f32; 16],
    begin: u64,
    end: u64,
) -> Result<()> {
    info!("batch sweep -> {}", filename);
    let mut out = create_output(filename)?;

    let state = depth_tested();
    let source = || {
        GeometrySource::new(generator.clone())
            .with_state(state.clone())
            .with_transform(transform)
    };
    let tests: Vec<Box<Test>> = vec![
        Box::new(ImmediateTest::new(source())),
        Box::new(DisplayListTest::new(source())),
        Box::new(VertexArrayTest::new(source())),
        Box::new(CompiledVertexArrayTest::new(source())),
        Box::new(VertexBufferObjectTest::new(source())),
    ];

    runner.run_tests_range(
        &mut out,
        tests,
        0.2,
        "TriangleRate",
        "BatchSize",
        PowerRange::new(begin, end, 1),
    )
}

/// Sequentially-indexed glDrawElements over growing batches, exposing the
/// post-transform vertex cache.
fn vertex_cache_sweep(runner: &mut Runner) -> Result<()> {
    info!("vertex cache sweep -> vcache.data");
    let mut out = create_output("vcache.data")?;

    let tests: Vec<Box<Test>> = vec![Box::new(IndexedArrayTest::new(
        GeometrySource::new(Rc::new(Zeroes)),
    ))];

    runner.run_tests_range(
        &mut out,
        tests,
        1.0,
        "TriangleRate",
        "BatchSize",
        PowerRange::new(1, 16, 1),
    )
}

/// Vertex-array throughput under 0 through 7 enabled lights.
fn light_sweep(runner: &mut Runner) -> Result<()> {
    info!("lighting sweep -> light.data");
    let mut out = create_output("light.data")?;

    let generator = Rc::new(SmallTriangles::new(WIDTH as f32, HEIGHT as f32));
    let mut tests: Vec<Box<Test>> = Vec::new();
    for count in 0..8 {
        let mut set = StateSet::new();
        set.set(State::Lighting(LightingState {
            enable: count > 0,
            light_count: count,
            ambient: [0.5, 0.5, 0.5, 1.0],
        }));
        let mut test =
            VertexArrayTest::new(GeometrySource::new(generator.clone()).with_state(set));
        test.set_property("BatchSize", 1024)?;
        tests.push(Box::new(test));
    }

    runner.run_tests(&mut out, tests, 1.0, "TriangleRate")
}

fn pixel_sweep(runner: &mut Runner) -> Result<()> {
    info!("pixel transfer sweep -> pixel.data");
    let mut out = create_output("pixel.data")?;

    let tests: Vec<Box<Test>> = vec![
        Box::new(CopyPixelTest),
        Box::new(DrawPixelTest::new()),
        Box::new(ReadPixelTest::new()),
    ];

    runner.run_tests(&mut out, tests, 1.0, "PixelRate")
}

fn upload_sweep(runner: &mut Runner) -> Result<()> {
    info!("texture upload sweep -> upload.data");
    let mut out = create_output("upload.data")?;

    let mut large = TextureUploadTest::new("Upload 512x512 u8", gl::UNSIGNED_BYTE);
    large.set_property("Width", 512)?;
    large.set_property("Height", 512)?;

    let tests: Vec<Box<Test>> = vec![
        Box::new(TextureUploadTest::new("Upload 256x256 u8", gl::UNSIGNED_BYTE)),
        Box::new(large),
        Box::new(TextureUploadTest::new("Upload 256x256 i8", gl::BYTE)),
        Box::new(TextureUploadTest::new("Upload 256x256 u16", gl::UNSIGNED_SHORT)),
        Box::new(TextureUploadTest::new("Upload 256x256 i16", gl::SHORT)),
        Box::new(TextureUploadTest::new("Upload 256x256 u32", gl::UNSIGNED_INT)),
        Box::new(TextureUploadTest::new("Upload 256x256 i32", gl::INT)),
        Box::new(TextureUploadTest::new("Upload 256x256 f32", gl::FLOAT)),
    ];

    runner.run_tests(&mut out, tests, 1.0, "TexelRate")
}

fn run() -> Result<()> {
    let mut surface = GlutinSurface::new("gl-probe", WIDTH, HEIGHT)?;
    let (width, height) = surface.dimensions();
    set_projection(width, height);

    info!("renderer: {}", glutil::renderer_name());
    info!(
        "screen: {}x{} at {} hidpi factor",
        width,
        height,
        surface.hidpi_factor()
    );

    let mut runner = Runner::new(&mut surface);

    let center = glutil::translation(width as f32 / 2.0, height as f32 / 2.0, 0.0);
    batch_sweep(&mut runner, "zeroes.data", Rc::new(Zeroes), center, 0, 14)?;

    // Scatter the visible triangles over the inner quarter of the screen so
    // a centering translation keeps them all on-screen.
    let quarter = glutil::translation(width as f32 / 4.0, height as f32 / 4.0, 0.0);
    let small = Rc::new(SmallTriangles::new(width as f32 / 2.0, height as f32 / 2.0));
    batch_sweep(&mut runner, "small_triangles.data", small, quarter, 0, 14)?;

    vertex_cache_sweep(&mut runner)?;
    light_sweep(&mut runner)?;
    pixel_sweep(&mut runner)?;
    upload_sweep(&mut runner)?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{:#}", e);
        process::exit(1);
    }
}
