use tracing::info;

use crate::actor::{MoveDirection, MoveOutcome, Player, Sprite};
use crate::collision::{CollisionBoxSet, CollisionError};
use crate::level::{LevelConfig, LevelLoadError};
use crate::map::GridMap;
use crate::raycast::{enqueue_player_marker, enqueue_sprite_marker, enqueue_tiles};
use crate::raycast::{FrameStats, Raycaster};

use super::rendering::{overlay_offset, RenderQueue, Rgba, Viewport};

/// Input for one simulation tick, built fresh by the input collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Signed turn; positive turns left (counter-clockwise).
    pub turn_degrees: i32,
    /// Set for exactly one tick per key press.
    pub toggle_view: bool,
}

impl FrameInput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_move(mut self, direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Forward => self.forward = true,
            MoveDirection::Backward => self.backward = true,
            MoveDirection::StrafeLeft => self.strafe_left = true,
            MoveDirection::StrafeRight => self.strafe_right = true,
        }
        self
    }

    pub fn with_turn(mut self, turn_degrees: i32) -> Self {
        self.turn_degrees = turn_degrees;
        self
    }

    pub fn with_toggle_view(mut self) -> Self {
        self.toggle_view = true;
        self
    }

    pub fn is_moving(&self, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Forward => self.forward,
            MoveDirection::Backward => self.backward,
            MoveDirection::StrafeLeft => self.strafe_left,
            MoveDirection::StrafeRight => self.strafe_right,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    FirstPerson,
    Overlay,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::Overlay,
            ViewMode::Overlay => ViewMode::FirstPerson,
        }
    }
}

/// Live session state: the static map, the player with its dynamic box, and
/// the sprites placed in the level.
#[derive(Debug, Clone)]
pub struct World {
    map: GridMap,
    player: Player,
    sprites: Vec<Sprite>,
    bodies: CollisionBoxSet,
    view_mode: ViewMode,
}

impl World {
    pub fn from_level(level: &LevelConfig) -> Result<Self, LevelLoadError> {
        let map = level.build_map()?;
        let mut bodies = CollisionBoxSet::new();
        let spawn = &level.spawn;
        let player = Player::spawn(spawn.x, spawn.y, spawn.angle_degrees, &mut bodies);
        let sprites = level
            .sprites
            .iter()
            .map(|sprite| Sprite::new(sprite.x, sprite.y, Rgba::from_array(sprite.color)))
            .collect::<Vec<_>>();

        info!(
            width = map.width(),
            height = map.height(),
            unit = map.unit(),
            static_boxes = map.static_boxes().len(),
            sprites = sprites.len(),
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            spawn_angle = player.angle_degrees(),
            "level_loaded"
        );

        Ok(Self {
            map,
            player,
            sprites,
            bodies,
            view_mode: ViewMode::default(),
        })
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn bodies(&self) -> &CollisionBoxSet {
        &self.bodies
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Applies the view toggle, the turn, then each requested move in
    /// strafe-left, strafe-right, forward, backward order. Returns the outcome
    /// of every move attempted.
    pub fn step(&mut self, input: &FrameInput) -> Result<Vec<MoveOutcome>, CollisionError> {
        if input.toggle_view {
            self.view_mode = self.view_mode.toggled();
            info!(view_mode = ?self.view_mode, "view_mode_toggled");
        }
        if input.turn_degrees != 0 {
            self.player.rotate(input.turn_degrees);
        }

        let mut outcomes = Vec::new();
        for direction in MoveDirection::ALL {
            if input.is_moving(direction) {
                outcomes.push(self.player.move_in(direction, &self.map, &mut self.bodies)?);
            }
        }
        Ok(outcomes)
    }

    /// Scroll offset that keeps the player centered on the top-down view.
    pub fn overlay_offset(&self, viewport: Viewport) -> (i32, i32) {
        overlay_offset(self.player.position(), self.map.pixel_size(), viewport)
    }

    /// Fills `queue` with this frame's primitives for the current view mode.
    pub fn render(
        &self,
        raycaster: &Raycaster,
        viewport: Viewport,
        queue: &mut RenderQueue,
    ) -> FrameStats {
        let viewer = self.player.avatar();
        match self.view_mode {
            ViewMode::FirstPerson => {
                let projection = raycaster.projection(viewport.width, viewport.height);
                let stats = raycaster.cast_frame(&self.map, viewer, &projection, queue);
                for sprite in &self.sprites {
                    sprite.enqueue(viewer, &projection, raycaster.config(), queue);
                }
                stats
            }
            ViewMode::Overlay => {
                let offset = self.overlay_offset(viewport);
                enqueue_tiles(&self.map, offset, queue);
                for sprite in &self.sprites {
                    enqueue_sprite_marker(
                        sprite,
                        raycaster.config().sprite_half_size,
                        offset,
                        queue,
                    );
                }
                enqueue_player_marker(viewer, offset, queue);
                raycaster.cast_overlay(&self.map, viewer, offset, queue)
            }
        }
    }
}
