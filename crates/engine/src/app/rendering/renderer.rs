use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::World;
use crate::raycast::{FrameStats, Raycaster};

use super::{PixelSurface, RenderQueue, Rgba, Viewport};

const CLEAR_COLOR: Rgba = Rgba::opaque(0, 0, 0);

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    queue: RenderQueue,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            queue: RenderQueue::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Rebuilds the render queue from `world`, paints it into the frame buffer
    /// and presents the result.
    pub(crate) fn render_world(
        &mut self,
        world: &World,
        raycaster: &Raycaster,
    ) -> Result<FrameStats, Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(FrameStats::default());
        }

        let stats = compose_frame(
            self.pixels.frame_mut(),
            self.viewport,
            world,
            raycaster,
            &mut self.queue,
        );
        self.pixels.render()?;
        Ok(stats)
    }
}

/// Clears `frame`, queues every primitive of the current view and drains the
/// queue onto it far-to-near. The queue is empty afterwards.
pub(crate) fn compose_frame(
    frame: &mut [u8],
    viewport: Viewport,
    world: &World,
    raycaster: &Raycaster,
    queue: &mut RenderQueue,
) -> FrameStats {
    queue.begin_frame();
    let stats = world.render(raycaster, viewport, queue);

    let mut surface = PixelSurface::new(frame, viewport.width, viewport.height);
    surface.clear(CLEAR_COLOR);
    queue.drain_and_draw(&mut surface);
    stats
}
