mod queue;
mod renderer;
mod surface;
mod transform;

pub use queue::{DrawElement, Primitive, RenderQueue};
pub use renderer::Renderer;
pub use surface::{CommandList, DrawCommand, PixelSurface, Rgba, Surface};
pub use transform::{overlay_offset, world_to_screen, Viewport};
