use tracing::debug;

use crate::actor::{heading_vector, normalize_degrees_f64, Avatar};
use crate::app::{RenderQueue, Rgba};
use crate::map::{GridMap, Tile};

use super::projection::Projection;

pub const SKY_COLOR: Rgba = Rgba::opaque(40, 48, 72);
pub const FLOOR_COLOR: Rgba = Rgba::opaque(56, 52, 48);
pub const HORIZONTAL_WALL_COLOR: Rgba = Rgba::opaque(196, 64, 56);
pub const VERTICAL_WALL_COLOR: Rgba = Rgba::opaque(140, 44, 40);
pub const MIN_SHADE: f64 = 0.15;

/// Direction components smaller than this are treated as parallel to the grid lines.
const AXIS_EPSILON: f64 = 1e-9;
/// Intersections this close to a grid line are snapped onto it.
const SNAP_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct RaycastConfig {
    pub fov_degrees: f64,
    pub ray_count: u32,
    pub wall_half_height: f64,
    pub max_view_distance: f64,
    pub sprite_half_size: f64,
    pub sprite_cone_degrees: f64,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            ray_count: 64,
            wall_half_height: 32.0,
            max_view_distance: 1024.0,
            sprite_half_size: 10.0,
            sprite_cone_degrees: 30.0,
        }
    }
}

/// Which family of grid lines a ray crossed when it hit a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub axis: HitAxis,
    pub col: i64,
    pub row: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySample {
    /// Offset from dead ahead, positive to the left.
    pub offset_degrees: f64,
    pub angle_degrees: f64,
    pub hit: Option<RayHit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub rays: usize,
    pub hits: usize,
    pub dropped: usize,
}

fn snap_to_grid(coord: f64, unit: f64) -> f64 {
    let nearest = (coord / unit).round() * unit;
    if (coord - nearest).abs() < SNAP_EPSILON {
        nearest
    } else {
        coord
    }
}

/// Cell containing `coord` when approached while moving in `direction`.
/// A coordinate exactly on a line belongs to the cell the ray is entering.
fn cell_index(coord: f64, direction: f64, unit: f64) -> i64 {
    let cell = (coord / unit).floor();
    if direction < -AXIS_EPSILON && cell * unit == coord {
        cell as i64 - 1
    } else {
        cell as i64
    }
}

fn line_index(line: f64, unit: f64) -> i64 {
    (line / unit).round() as i64
}

/// First wall met where the ray crosses a horizontal grid line.
///
/// Returns `None` for rays parallel to the horizontal lines and for rays that
/// leave the map before meeting a wall.
pub fn horizontal_hit(map: &GridMap, origin: (f64, f64), angle_degrees: f64) -> Option<RayHit> {
    let (dir_x, dir_y) = heading_vector(angle_degrees);
    if dir_y.abs() < AXIS_EPSILON {
        return None;
    }
    let unit = map.unit() as f64;
    let (px, py) = origin;
    let upward = dir_y < 0.0;
    let base = (py / unit).floor() * unit;
    let (mut line_y, step) = if upward {
        (base, -unit)
    } else {
        (base + unit, unit)
    };

    for _ in 0..=map.height() {
        let x = snap_to_grid(px + (line_y - py) * dir_x / dir_y, unit);
        let row = line_index(line_y, unit) - i64::from(upward);
        let col = cell_index(x, dir_x, unit);
        match map.tile(col, row)? {
            Tile::Wall => {
                return Some(RayHit {
                    x,
                    y: line_y,
                    distance: (x - px).hypot(line_y - py),
                    axis: HitAxis::Horizontal,
                    col,
                    row,
                })
            }
            Tile::Empty => line_y += step,
        }
    }
    None
}

/// First wall met where the ray crosses a vertical grid line.
pub fn vertical_hit(map: &GridMap, origin: (f64, f64), angle_degrees: f64) -> Option<RayHit> {
    let (dir_x, dir_y) = heading_vector(angle_degrees);
    if dir_x.abs() < AXIS_EPSILON {
        return None;
    }
    let unit = map.unit() as f64;
    let (px, py) = origin;
    let leftward = dir_x < 0.0;
    let base = (px / unit).floor() * unit;
    let (mut line_x, step) = if leftward {
        (base, -unit)
    } else {
        (base + unit, unit)
    };

    for _ in 0..=map.width() {
        let y = snap_to_grid(py + (line_x - px) * dir_y / dir_x, unit);
        let col = line_index(line_x, unit) - i64::from(leftward);
        let row = cell_index(y, dir_y, unit);
        match map.tile(col, row)? {
            Tile::Wall => {
                return Some(RayHit {
                    x: line_x,
                    y,
                    distance: (line_x - px).hypot(y - py),
                    axis: HitAxis::Vertical,
                    col,
                    row,
                })
            }
            Tile::Empty => line_x += step,
        }
    }
    None
}

/// Nearest of the horizontal and vertical hits. Ties go to the vertical hit.
pub fn cast_ray(map: &GridMap, origin: (f64, f64), angle_degrees: f64) -> Option<RayHit> {
    match (
        horizontal_hit(map, origin, angle_degrees),
        vertical_hit(map, origin, angle_degrees),
    ) {
        (Some(h), Some(v)) => Some(if h.distance < v.distance { h } else { v }),
        (Some(h), None) => Some(h),
        (None, v) => v,
    }
}

/// Distance-based darkening, from 1.0 at the viewer down to [`MIN_SHADE`].
pub fn shade_factor(distance: f64, max_view_distance: f64) -> f64 {
    if max_view_distance <= 0.0 || !distance.is_finite() {
        return MIN_SHADE;
    }
    (1.0 - distance / max_view_distance).clamp(MIN_SHADE, 1.0)
}

pub fn wall_color(axis: HitAxis) -> Rgba {
    match axis {
        HitAxis::Horizontal => HORIZONTAL_WALL_COLOR,
        HitAxis::Vertical => VERTICAL_WALL_COLOR,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Raycaster {
    config: RaycastConfig,
}

impl Raycaster {
    pub fn new(config: RaycastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection::new(width, height, self.config.fov_degrees)
    }

    /// Ray offsets from `+fov/2` (leftmost column) down to `-fov/2`, evenly spaced.
    pub fn ray_offsets(&self) -> impl Iterator<Item = f64> + '_ {
        let count = self.config.ray_count;
        let fov = self.config.fov_degrees;
        let spacing = if count > 1 {
            fov / (count - 1) as f64
        } else {
            0.0
        };
        let start = if count > 1 { fov * 0.5 } else { 0.0 };
        (0..count).map(move |index| start - index as f64 * spacing)
    }

    /// Casts every ray of the fan without projecting anything.
    pub fn sweep(&self, map: &GridMap, viewer: &Avatar) -> Vec<RaySample> {
        let facing = viewer.angle_degrees() as f64;
        self.ray_offsets()
            .map(|offset_degrees| {
                let angle_degrees = normalize_degrees_f64(facing + offset_degrees);
                RaySample {
                    offset_degrees,
                    angle_degrees,
                    hit: cast_ray(map, viewer.position(), angle_degrees),
                }
            })
            .collect()
    }

    /// Populates `queue` with the sky/floor backdrop and one wall slice per ray.
    ///
    /// Slices are keyed by the raw ray distance; only their screen height uses
    /// the fisheye-corrected distance. Rays that find no wall are drawn at the
    /// maximum view distance.
    pub fn cast_frame(
        &self,
        map: &GridMap,
        viewer: &Avatar,
        projection: &Projection,
        queue: &mut RenderQueue,
    ) -> FrameStats {
        let width = projection.width() as i32;
        let height = projection.height() as i32;
        let horizon = height / 2;
        queue.insert_rect(f64::INFINITY, 0, 0, width, horizon, SKY_COLOR);
        queue.insert_rect(f64::INFINITY, 0, horizon, width, height - horizon, FLOOR_COLOR);

        let samples = self.sweep(map, viewer);
        let count = samples.len() as i64;
        let mut stats = FrameStats {
            rays: samples.len(),
            ..FrameStats::default()
        };

        for (index, sample) in samples.iter().enumerate() {
            let index = index as i64;
            let x0 = (index * width as i64 / count) as i32;
            let x1 = ((index + 1) * width as i64 / count) as i32;

            let (raw, color) = match sample.hit {
                Some(hit) => {
                    stats.hits += 1;
                    let raw = hit.distance.min(self.config.max_view_distance);
                    let shade = shade_factor(raw, self.config.max_view_distance);
                    (raw, wall_color(hit.axis).shaded(shade))
                }
                None => {
                    stats.dropped += 1;
                    debug!(
                        angle = sample.angle_degrees,
                        x = viewer.x,
                        y = viewer.y,
                        "ray_dropped"
                    );
                    let raw = self.config.max_view_distance;
                    (raw, VERTICAL_WALL_COLOR.shaded(MIN_SHADE))
                }
            };

            let corrected = raw * sample.offset_degrees.to_radians().cos();
            let (top, bottom) = projection.vertical_span(self.config.wall_half_height, corrected);
            queue.insert_rect(raw, x0, top, x1 - x0, bottom - top, color);
        }
        stats
    }
}
