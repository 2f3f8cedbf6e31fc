/// Pinhole projection onto a flat screen of `width` x `height` pixels.
///
/// Offsets are measured in degrees from the view direction, positive to the
/// left (counter-clockwise), so `+fov/2` maps to column 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    fov_degrees: f64,
    plane_distance: f64,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov_degrees: f64) -> Self {
        Self {
            width,
            height,
            fov_degrees,
            plane_distance: plane_distance(width, fov_degrees),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    pub fn plane_distance(&self) -> f64 {
        self.plane_distance
    }

    pub fn horizon(&self) -> f64 {
        self.height as f64 * 0.5
    }

    /// Screen-space half extent of something `world_half` pixels tall at `distance`.
    pub fn projected_half(&self, world_half: f64, distance: f64) -> f64 {
        if distance <= 0.0 || !distance.is_finite() {
            return self.horizon();
        }
        world_half * self.plane_distance / distance
    }

    /// Screen-space half extent of a billboard, capped at the larger screen side.
    pub fn billboard_half(&self, world_half: f64, distance: f64) -> f64 {
        let cap = self.width.max(self.height) as f64;
        self.projected_half(world_half, distance).min(cap)
    }

    /// `(top, bottom)` rows for a wall slice centered on the horizon, clamped to the screen.
    pub fn vertical_span(&self, world_half: f64, distance: f64) -> (i32, i32) {
        let half = self.projected_half(world_half, distance);
        let horizon = self.horizon();
        let max = self.height as f64;
        let top = (horizon - half).floor().clamp(0.0, max);
        let bottom = (horizon + half).floor().clamp(0.0, max);
        (top as i32, bottom as i32)
    }

    /// Screen x for a direction `offset_degrees` away from dead ahead.
    pub fn screen_x(&self, offset_degrees: f64) -> f64 {
        if self.fov_degrees <= 0.0 {
            return self.width as f64 * 0.5;
        }
        (self.fov_degrees * 0.5 - offset_degrees) / self.fov_degrees * self.width as f64
    }
}

/// `(width / 2) / tan(fov / 2)`.
pub fn plane_distance(width: u32, fov_degrees: f64) -> f64 {
    let half_fov = (fov_degrees * 0.5).to_radians();
    (width as f64 * 0.5) / half_fov.tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_plane_distance() {
        let projection = Projection::new(640, 480, 60.0);
        assert!((projection.plane_distance() - 554.256_258_422).abs() < 1e-6);
        assert_eq!(projection.horizon(), 240.0);
    }

    #[test]
    fn billboard_half_is_capped_near_the_viewer() {
        let projection = Projection::new(640, 480, 60.0);
        assert_eq!(projection.billboard_half(10.0, 1e-7), 640.0);
        assert!((projection.billboard_half(10.0, 120.0) - 46.188_021_535).abs() < 1e-6);
    }

    #[test]
    fn vertical_span_is_centered_and_clamped() {
        let projection = Projection::new(640, 480, 60.0);

        let (top, bottom) = projection.vertical_span(32.0, 256.0);
        assert_eq!((top, bottom), (170, 309));

        let (top, bottom) = projection.vertical_span(32.0, 1.0);
        assert_eq!((top, bottom), (0, 480));
    }

    #[test]
    fn screen_x_spans_left_to_right() {
        let projection = Projection::new(640, 480, 60.0);
        assert_eq!(projection.screen_x(30.0), 0.0);
        assert_eq!(projection.screen_x(0.0), 320.0);
        assert_eq!(projection.screen_x(-30.0), 640.0);
    }
}
