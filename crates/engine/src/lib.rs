pub mod actor;
pub mod app;
pub mod collision;
pub mod level;
pub mod map;
pub mod raycast;

pub use actor::{Avatar, Billboard, MoveDirection, MoveOutcome, MoveResolution, Player, Sprite};
pub use app::{
    run_app, AppError, CommandList, DrawCommand, FrameInput, InputAction, LoopConfig,
    LoopMetricsSnapshot, PixelSurface, RenderQueue, Renderer, Rgba, Surface, ViewMode, Viewport,
    World,
};
pub use collision::{BoxHandle, CollisionBox, CollisionBoxSet, CollisionError};
pub use level::{LevelConfig, LevelLoadError, SpawnConfig, SpriteConfig, LEVEL_ENV_VAR};
pub use map::{build_static_collision, GridMap, MapConfig, MapError, Tile};
pub use raycast::{FrameStats, Projection, RaycastConfig, Raycaster};
