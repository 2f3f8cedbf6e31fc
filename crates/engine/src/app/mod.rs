mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod world;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    overlay_offset, world_to_screen, CommandList, DrawCommand, DrawElement, PixelSurface,
    Primitive, RenderQueue, Renderer, Rgba, Surface, Viewport,
};
pub use world::{FrameInput, ViewMode, World};
