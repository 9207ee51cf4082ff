//! Pixel-transfer rates over a fixed 256x256 RGBA block: framebuffer to
//! framebuffer, host to framebuffer, and framebuffer to host.

use anyhow::Result;

use gl;
use gl::types::*;
use result::{ResultDesc, ResultSet};
use test::Test;

pub static PIXEL_DESCS: &[ResultDesc] = &[ResultDesc::new("PixelRate", "pixel/s")];

const BLOCK_WIDTH: usize = 256;
const BLOCK_HEIGHT: usize = 256;
const BLOCK_PIXELS: f64 = (BLOCK_WIDTH * BLOCK_HEIGHT) as f64;

/// glCopyPixels within the framebuffer.
pub struct CopyPixelTest;

impl Test for CopyPixelTest {
    fn name(&self) -> &str {
        "Copy Pixels"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        PIXEL_DESCS
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::CopyPixels(0, 0, BLOCK_WIDTH as GLsizei, BLOCK_HEIGHT as GLsizei, gl::COLOR);
        }
        results[0] += BLOCK_PIXELS;
        Ok(())
    }
}

/// glDrawPixels from a host buffer.
pub struct DrawPixelTest {
    buffer: Vec<u8>,
}

impl DrawPixelTest {
    pub fn new() -> DrawPixelTest {
        DrawPixelTest { buffer: Vec::new() }
    }
}

impl Test for DrawPixelTest {
    fn name(&self) -> &str {
        "Draw Pixels"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        PIXEL_DESCS
    }

    fn setup(&mut self) -> Result<()> {
        self.buffer.resize(BLOCK_WIDTH * BLOCK_HEIGHT * 4, 0);
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::DrawPixels(
                BLOCK_WIDTH as GLsizei,
                BLOCK_HEIGHT as GLsizei,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                self.buffer.as_ptr() as *const GLvoid,
            );
        }
        results[0] += BLOCK_PIXELS;
        Ok(())
    }
}

/// glReadPixels into a host buffer.
pub struct ReadPixelTest {
    buffer: Vec<u8>,
}

impl ReadPixelTest {
    pub fn new() -> ReadPixelTest {
        ReadPixelTest { buffer: Vec::new() }
    }
}

impl Test for ReadPixelTest {
    fn name(&self) -> &str {
        "Read Pixels"
    }

    fn descs(&self) -> &'static [ResultDesc] {
        PIXEL_DESCS
    }

    fn setup(&mut self) -> Result<()> {
        self.buffer.resize(BLOCK_WIDTH * BLOCK_HEIGHT * 4, 0);
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::ReadPixels(
                0,
                0,
                BLOCK_WIDTH as GLsizei,
                BLOCK_HEIGHT as GLsizei,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                self.buffer.as_mut_ptr() as *mut GLvoid,
            );
        }
        results[0] += BLOCK_PIXELS;
        Ok(())
    }
}
