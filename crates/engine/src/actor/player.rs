use tracing::debug;

use crate::collision::{BoxHandle, CollisionBox, CollisionBoxSet, CollisionError};
use crate::map::GridMap;

use super::avatar::{Avatar, MoveDirection};

pub const PLAYER_BOX_SIZE: i32 = 20;
pub const PLAYER_BOX_HALF_EXTENT: i32 = PLAYER_BOX_SIZE / 2;
/// Distance covered by one directional move command, in world pixels.
pub const STEP_DISTANCE: f64 = 1.0;

const NEGLIGIBLE_DISPLACEMENT: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResolution {
    /// The full step was applied.
    Clear,
    /// Only the x component survived.
    SlidX,
    /// Only the y component survived.
    SlidY,
    /// Every candidate collided; the player did not move.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub x: f64,
    pub y: f64,
    pub resolution: MoveResolution,
}

/// Box origin for a player standing at `(x, y)`.
pub fn box_origin(x: f64, y: f64) -> (i32, i32) {
    (
        x.floor() as i32 - PLAYER_BOX_HALF_EXTENT,
        y.floor() as i32 - PLAYER_BOX_HALF_EXTENT,
    )
}

pub fn box_at(x: f64, y: f64) -> CollisionBox {
    let (bx, by) = box_origin(x, y);
    CollisionBox::new(bx, by, PLAYER_BOX_SIZE, PLAYER_BOX_SIZE)
}

/// Avatar plus the dynamic collision box it owns in a body set.
#[derive(Debug, Clone)]
pub struct Player {
    avatar: Avatar,
    body: BoxHandle,
}

impl Player {
    pub fn spawn(x: f64, y: f64, angle_degrees: i32, bodies: &mut CollisionBoxSet) -> Self {
        let (bx, by) = box_origin(x, y);
        let body = bodies.add(bx, by, PLAYER_BOX_SIZE, PLAYER_BOX_SIZE);
        Self {
            avatar: Avatar::new(x, y, angle_degrees),
            body,
        }
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn body(&self) -> BoxHandle {
        self.body
    }

    pub fn position(&self) -> (f64, f64) {
        self.avatar.position()
    }

    pub fn angle_degrees(&self) -> i32 {
        self.avatar.angle_degrees()
    }

    pub fn rotate(&mut self, delta_degrees: i32) {
        self.avatar.rotate(delta_degrees);
    }

    pub fn move_in(
        &mut self,
        direction: MoveDirection,
        map: &GridMap,
        bodies: &mut CollisionBoxSet,
    ) -> Result<MoveOutcome, CollisionError> {
        resolve_move(direction, self, map, bodies)
    }

    /// Releases the player's box from `bodies`.
    pub fn despawn(self, bodies: &mut CollisionBoxSet) -> Result<CollisionBox, CollisionError> {
        bodies.remove(self.body)
    }

    fn place(
        &mut self,
        x: f64,
        y: f64,
        bodies: &mut CollisionBoxSet,
    ) -> Result<CollisionBox, CollisionError> {
        self.avatar.set_position(x, y);
        let (bx, by) = box_origin(x, y);
        bodies.move_to(self.body, bx, by)?;
        bodies.get(self.body)
    }
}

/// Applies one step toward `direction`, sliding along walls when the full step collides.
pub fn resolve_move(
    direction: MoveDirection,
    player: &mut Player,
    map: &GridMap,
    bodies: &mut CollisionBoxSet,
) -> Result<MoveOutcome, CollisionError> {
    let (dx, dy) = player.avatar.step_vector(direction, STEP_DISTANCE);
    let outcome = slide(player, dx, dy, map, bodies)?;
    if outcome.resolution == MoveResolution::Blocked {
        debug!(
            ?direction,
            x = outcome.x,
            y = outcome.y,
            angle = player.angle_degrees(),
            "move_blocked"
        );
    }
    Ok(outcome)
}

/// Tries the full displacement, then drops the dominant axis, then keeps only
/// the dominant axis. Only the map's static boxes block movement. The player's
/// box tracks every attempted position, including the final fallback.
pub fn slide(
    player: &mut Player,
    dx: f64,
    dy: f64,
    map: &GridMap,
    bodies: &mut CollisionBoxSet,
) -> Result<MoveOutcome, CollisionError> {
    let (origin_x, origin_y) = player.position();
    let x_dominant = dx.abs() >= dy.abs();
    let candidates = if x_dominant {
        [
            (dx, dy, MoveResolution::Clear),
            (0.0, dy, MoveResolution::SlidY),
            (dx, 0.0, MoveResolution::SlidX),
        ]
    } else {
        [
            (dx, dy, MoveResolution::Clear),
            (dx, 0.0, MoveResolution::SlidX),
            (0.0, dy, MoveResolution::SlidY),
        ]
    };

    for (step_x, step_y, resolution) in candidates {
        let negligible =
            step_x.abs() < NEGLIGIBLE_DISPLACEMENT && step_y.abs() < NEGLIGIBLE_DISPLACEMENT;
        if negligible && resolution != MoveResolution::Clear {
            continue;
        }
        let (x, y) = (origin_x + step_x, origin_y + step_y);
        let probe = player.place(x, y, bodies)?;
        if !map.collides(&probe) {
            return Ok(MoveOutcome { x, y, resolution });
        }
    }

    player.place(origin_x, origin_y, bodies)?;
    Ok(MoveOutcome {
        x: origin_x,
        y: origin_y,
        resolution: MoveResolution::Blocked,
    })
}
