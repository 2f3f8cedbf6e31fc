use crate::app::{RenderQueue, Rgba};
use crate::raycast::{Projection, RaycastConfig};

use super::avatar::{signed_degrees, Avatar};

pub const DEFAULT_SPRITE_COLOR: Rgba = Rgba::opaque(0, 0, 255);

const CONE_TOLERANCE_DEGREES: f64 = 1e-9;

/// World heading in degrees of the vector `(adj, opp)`, in `[0, 360)`.
///
/// `opp` grows downward, so a target straight above (`adj == 0`, `opp < 0`)
/// is at 90 degrees.
pub fn bearing_degrees(adj: f64, opp: f64) -> f64 {
    if adj == 0.0 {
        return if opp < 0.0 { 90.0 } else { 270.0 };
    }
    let reference = (opp / adj).atan().abs().to_degrees();
    if adj > 0.0 && opp <= 0.0 {
        reference
    } else if adj < 0.0 && opp <= 0.0 {
        180.0 - reference
    } else if adj < 0.0 {
        180.0 + reference
    } else {
        360.0 - reference
    }
}

/// Signed offset of `(x, y)` from the viewer's facing, in `(-180, 180]`, positive to the left.
pub fn relative_bearing(viewer: &Avatar, x: f64, y: f64) -> f64 {
    let bearing = bearing_degrees(x - viewer.x, y - viewer.y);
    signed_degrees(bearing - viewer.angle_degrees() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub relative_bearing: f64,
    pub distance: f64,
    pub center_x: f64,
    pub half_size: f64,
}

impl Billboard {
    /// `(x, y, width, height)` of the on-screen square.
    pub fn screen_rect(&self, horizon: f64) -> (i32, i32, i32, i32) {
        let left = (self.center_x - self.half_size).floor() as i32;
        let right = (self.center_x + self.half_size).floor() as i32;
        let top = (horizon - self.half_size).floor() as i32;
        let bottom = (horizon + self.half_size).floor() as i32;
        (left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }
}

/// Point entity drawn as a camera-facing flat square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    avatar: Avatar,
    color: Rgba,
}

impl Sprite {
    pub fn new(x: f64, y: f64, color: Rgba) -> Self {
        Self {
            avatar: Avatar::new(x, y, 0),
            color,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.avatar.position()
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Screen placement as seen from `viewer`, or `None` when outside the view cone
    /// or standing on the viewer.
    pub fn project(
        &self,
        viewer: &Avatar,
        projection: &Projection,
        config: &RaycastConfig,
    ) -> Option<Billboard> {
        let (x, y) = self.position();
        let distance = viewer.distance_to(x, y);
        if distance <= f64::EPSILON {
            return None;
        }
        let relative_bearing = relative_bearing(viewer, x, y);
        if relative_bearing.abs() > config.sprite_cone_degrees + CONE_TOLERANCE_DEGREES {
            return None;
        }
        Some(Billboard {
            relative_bearing,
            distance,
            center_x: projection.screen_x(relative_bearing),
            half_size: projection.billboard_half(config.sprite_half_size, distance),
        })
    }

    /// Inserts the billboard keyed by Euclidean distance; returns it when drawn.
    pub fn enqueue(
        &self,
        viewer: &Avatar,
        projection: &Projection,
        config: &RaycastConfig,
        queue: &mut RenderQueue,
    ) -> Option<Billboard> {
        let billboard = self.project(viewer, projection, config)?;
        let (x, y, width, height) = billboard.screen_rect(projection.horizon());
        queue.insert_rect(billboard.distance, x, y, width, height, self.color);
        Some(billboard)
    }
}
