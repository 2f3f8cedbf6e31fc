mod avatar;
mod player;
mod sprite;

pub use avatar::{
    heading_vector, normalize_degrees, normalize_degrees_f64, signed_degrees, Avatar,
    MoveDirection,
};
pub use player::{
    box_at, box_origin, resolve_move, slide, MoveOutcome, MoveResolution, Player,
    PLAYER_BOX_HALF_EXTENT, PLAYER_BOX_SIZE, STEP_DISTANCE,
};
pub use sprite::{bearing_degrees, relative_bearing, Billboard, Sprite, DEFAULT_SPRITE_COLOR};
