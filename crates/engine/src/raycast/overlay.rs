use crate::actor::{heading_vector, Avatar, Sprite};
use crate::app::{world_to_screen, RenderQueue, Rgba};
use crate::map::GridMap;

use super::caster::{FrameStats, Raycaster};

pub const OVERLAY_TILE_COLOR: Rgba = Rgba::opaque(0, 0, 255);
pub const OVERLAY_PLAYER_COLOR: Rgba = Rgba::opaque(255, 0, 0);
pub const OVERLAY_HEADING_COLOR: Rgba = Rgba::opaque(0, 255, 0);
pub const OVERLAY_SPRITE_COLOR: Rgba = Rgba::opaque(0, 200, 255);
pub const OVERLAY_RAY_COLOR: Rgba = Rgba::new(255, 255, 0, 50);

// Paint order for the top-down view: tiles, sprites, player, rays.
const TILE_DEPTH: f64 = 4.0;
const SPRITE_DEPTH: f64 = 3.0;
const PLAYER_DEPTH: f64 = 2.0;
const RAY_DEPTH: f64 = 1.0;

const PLAYER_MARKER_HALF: i32 = 10;
const HEADING_LENGTH: f64 = 20.0;
const ARROW_BARB_LENGTH: f64 = 14.0;
const ARROW_BARB_SPREAD_DEGREES: f64 = 30.0;

pub fn enqueue_tiles(map: &GridMap, offset: (i32, i32), queue: &mut RenderQueue) -> usize {
    let unit = map.unit() as i32;
    let mut count = 0;
    for (col, row) in map.walls() {
        let x = col as i32 * unit - offset.0;
        let y = row as i32 * unit - offset.1;
        queue.insert_rect(TILE_DEPTH, x, y, unit, unit, OVERLAY_TILE_COLOR);
        count += 1;
    }
    count
}

pub fn enqueue_sprite_marker(
    sprite: &Sprite,
    half_size: f64,
    offset: (i32, i32),
    queue: &mut RenderQueue,
) {
    let (cx, cy) = world_to_screen(sprite.position(), offset);
    let half = half_size.round().max(1.0) as i32;
    queue.insert_rect(
        SPRITE_DEPTH,
        cx - half,
        cy - half,
        half * 2,
        half * 2,
        OVERLAY_SPRITE_COLOR,
    );
}

/// Player square plus a heading arrow.
pub fn enqueue_player_marker(avatar: &Avatar, offset: (i32, i32), queue: &mut RenderQueue) {
    let (cx, cy) = world_to_screen(avatar.position(), offset);
    queue.insert_rect(
        PLAYER_DEPTH,
        cx - PLAYER_MARKER_HALF,
        cy - PLAYER_MARKER_HALF,
        PLAYER_MARKER_HALF * 2,
        PLAYER_MARKER_HALF * 2,
        OVERLAY_PLAYER_COLOR,
    );

    let heading = avatar.angle_degrees() as f64;
    let along = |angle: f64, length: f64| {
        let (dx, dy) = heading_vector(angle);
        world_to_screen((avatar.x + dx * length, avatar.y + dy * length), offset)
    };
    let tip = along(heading, HEADING_LENGTH);
    let left = along(heading + ARROW_BARB_SPREAD_DEGREES, ARROW_BARB_LENGTH);
    let right = along(heading - ARROW_BARB_SPREAD_DEGREES, ARROW_BARB_LENGTH);

    queue.insert_line(PLAYER_DEPTH, cx, cy, tip.0, tip.1, OVERLAY_HEADING_COLOR);
    queue.insert_line(PLAYER_DEPTH, left.0, left.1, tip.0, tip.1, OVERLAY_HEADING_COLOR);
    queue.insert_line(PLAYER_DEPTH, right.0, right.1, tip.0, tip.1, OVERLAY_HEADING_COLOR);
}

impl Raycaster {
    /// Draws one translucent line per ray from the viewer to its hit point on the
    /// top-down view. Dropped rays stop at the maximum view distance.
    pub fn cast_overlay(
        &self,
        map: &GridMap,
        viewer: &Avatar,
        offset: (i32, i32),
        queue: &mut RenderQueue,
    ) -> FrameStats {
        let samples = self.sweep(map, viewer);
        let mut stats = FrameStats {
            rays: samples.len(),
            ..FrameStats::default()
        };
        let (x0, y0) = world_to_screen(viewer.position(), offset);

        for sample in &samples {
            let end = match sample.hit {
                Some(hit) => {
                    stats.hits += 1;
                    (hit.x, hit.y)
                }
                None => {
                    stats.dropped += 1;
                    let (dx, dy) = heading_vector(sample.angle_degrees);
                    let reach = self.config().max_view_distance;
                    (viewer.x + dx * reach, viewer.y + dy * reach)
                }
            };
            let (x1, y1) = world_to_screen(end, offset);
            queue.insert_line(RAY_DEPTH, x0, y0, x1, y1, OVERLAY_RAY_COLOR);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CommandList, DrawCommand};

    #[test]
    fn overlay_paints_tiles_then_player_then_rays() {
        let map = GridMap::canonical();
        let raycaster = Raycaster::default();
        let viewer = Avatar::new(320.0, 320.0, 90);
        let offset = (0, 80);
        let mut queue = RenderQueue::new();

        assert_eq!(enqueue_tiles(&map, offset, &mut queue), 40);
        enqueue_player_marker(&viewer, offset, &mut queue);
        let stats = raycaster.cast_overlay(&map, &viewer, offset, &mut queue);
        assert_eq!(stats.hits, 64);

        let mut surface = CommandList::new(640, 480);
        assert_eq!(queue.drain_and_draw(&mut surface), 40 + 4 + 64);

        let commands = surface.into_commands();
        assert!(commands[..40].iter().all(|command| matches!(
            command,
            DrawCommand::FillRect { color, .. } if *color == OVERLAY_TILE_COLOR
        )));
        assert_eq!(
            commands[40],
            DrawCommand::FillRect {
                x0: 310,
                y0: 230,
                x1: 330,
                y1: 250,
                color: OVERLAY_PLAYER_COLOR,
            }
        );
        assert!(commands[44..].iter().all(|command| matches!(
            command,
            DrawCommand::Line { x0: 320, y0: 240, color, .. } if *color == OVERLAY_RAY_COLOR
        )));
    }

    #[test]
    fn heading_arrow_points_along_facing() {
        let viewer = Avatar::new(100.0, 100.0, 0);
        let mut queue = RenderQueue::new();
        enqueue_player_marker(&viewer, (0, 0), &mut queue);

        let shaft = queue
            .iter()
            .find_map(|element| match element.primitive {
                crate::app::Primitive::Line { x0, y0, x1, y1 } => Some((x0, y0, x1, y1)),
                _ => None,
            })
            .expect("shaft line");
        assert_eq!(shaft, (100, 100, 120, 100));
    }

    #[test]
    fn overlay_ray_ends_at_wall_hit() {
        let map = GridMap::canonical();
        let raycaster = Raycaster::new(crate::raycast::RaycastConfig {
            ray_count: 1,
            ..Default::default()
        });
        let viewer = Avatar::new(320.0, 320.0, 90);
        let mut queue = RenderQueue::new();
        raycaster.cast_overlay(&map, &viewer, (0, 80), &mut queue);

        let element = queue.iter().next().expect("one ray");
        assert_eq!(
            element.primitive,
            crate::app::Primitive::Line {
                x0: 320,
                y0: 240,
                x1: 320,
                y1: -16,
            }
        );
    }

    #[test]
    fn sprite_marker_is_centered_on_sprite() {
        let sprite = Sprite::new(200.0, 150.0, Rgba::opaque(1, 1, 1));
        let mut queue = RenderQueue::new();
        enqueue_sprite_marker(&sprite, 10.0, (0, 80), &mut queue);

        let element = queue.iter().next().expect("marker");
        assert_eq!(
            element.primitive,
            crate::app::Primitive::Rect {
                x: 190,
                y: 60,
                width: 20,
                height: 20,
            }
        );
    }
}
