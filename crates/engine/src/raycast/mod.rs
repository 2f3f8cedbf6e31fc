mod caster;
mod overlay;
mod projection;

pub use caster::{
    cast_ray, horizontal_hit, shade_factor, vertical_hit, wall_color, FrameStats, HitAxis,
    RayHit, RaySample, RaycastConfig, Raycaster, FLOOR_COLOR, HORIZONTAL_WALL_COLOR, MIN_SHADE,
    SKY_COLOR, VERTICAL_WALL_COLOR,
};
pub use overlay::{
    enqueue_player_marker, enqueue_sprite_marker, enqueue_tiles, OVERLAY_HEADING_COLOR,
    OVERLAY_PLAYER_COLOR, OVERLAY_RAY_COLOR, OVERLAY_SPRITE_COLOR, OVERLAY_TILE_COLOR,
};
pub use projection::{plane_distance, Projection};
