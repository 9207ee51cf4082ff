//! The window/context boundary. The harness only ever needs the five
//! operations of the `Surface` trait, so the run loop can be exercised
//! against a stub without a live context.

use std::process;

use anyhow::Result;
use glutin;
use glutin::GlContext;

use gl;

pub trait Surface {
    fn dimensions(&self) -> (u32, u32);

    /// Clears the color buffer; part of the between-tests display reset.
    fn clear(&mut self);

    fn swap(&mut self) -> Result<()>;

    /// Polls the event queue without blocking. A quit request terminates
    /// the process immediately.
    fn pump_events(&mut self);

    /// Blocks until all submitted GPU work has completed.
    fn finish(&mut self);
}

pub struct GlutinSurface {
    events_loop: glutin::EventsLoop,
    window: glutin::GlWindow,
    size: (u32, u32),
}

impl GlutinSurface {
    /// Creates the window and context with the benchmark's minimum
    /// requirements: RGB >= 5 bits per channel, depth >= 16 bits, double
    /// buffered, vsync off.
    pub fn new(title: &str, width: u32, height: u32) -> Result<GlutinSurface> {
        let events_loop = glutin::EventsLoop::new();
        let window = glutin::WindowBuilder::new()
            .with_title(title)
            .with_dimensions(width, height);
        let context = glutin::ContextBuilder::new()
            .with_vsync(false)
            .with_pixel_format(15, 0)
            .with_depth_buffer(16);
        let window = glutin::GlWindow::new(window, context, &events_loop)
            .map_err(|e| anyhow!("window creation failed: {}", e))?;

        unsafe { window.make_current() }
            .map_err(|e| anyhow!("making the context current failed: {}", e))?;
        gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);

        Ok(GlutinSurface {
            events_loop: events_loop,
            window: window,
            size: (width, height),
        })
    }

    pub fn hidpi_factor(&self) -> f32 {
        self.window.hidpi_factor()
    }
}

impl Surface for GlutinSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.window.get_inner_size().unwrap_or(self.size)
    }

    fn clear(&mut self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn swap(&mut self) -> Result<()> {
        self.window
            .swap_buffers()
            .map_err(|e| anyhow!("swapping buffers failed: {}", e))
    }

    fn pump_events(&mut self) {
        let mut quit = false;
        self.events_loop.poll_events(|event| {
            if let glutin::Event::WindowEvent { event: glutin::WindowEvent::Closed, .. } = event {
                quit = true;
            }
        });
        if quit {
            info!("quit requested");
            process::exit(0);
        }
    }

    fn finish(&mut self) {
        unsafe {
            gl::Finish();
        }
    }
}
