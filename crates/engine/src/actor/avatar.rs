/// Unit direction for a heading in degrees.
///
/// Angles are counter-clockwise from +x with screen y pointing down, so 90
/// degrees faces toward decreasing y.
pub fn heading_vector(angle_degrees: f64) -> (f64, f64) {
    let radians = angle_degrees.to_radians();
    (radians.cos(), -radians.sin())
}

pub fn normalize_degrees(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

/// Wraps into `[0, 360)`.
pub fn normalize_degrees_f64(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps into `(-180, 180]`.
pub fn signed_degrees(angle: f64) -> f64 {
    let wrapped = normalize_degrees_f64(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::StrafeLeft,
        MoveDirection::StrafeRight,
        MoveDirection::Forward,
        MoveDirection::Backward,
    ];

    /// Heading offset relative to the facing angle.
    pub const fn offset_degrees(self) -> i32 {
        match self {
            MoveDirection::Forward => 0,
            MoveDirection::Backward => 180,
            MoveDirection::StrafeLeft => 90,
            MoveDirection::StrafeRight => -90,
        }
    }
}

/// Position plus integer facing angle, always kept in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar {
    pub x: f64,
    pub y: f64,
    angle_degrees: i32,
}

impl Avatar {
    pub fn new(x: f64, y: f64, angle_degrees: i32) -> Self {
        Self {
            x,
            y,
            angle_degrees: normalize_degrees(angle_degrees),
        }
    }

    pub fn angle_degrees(&self) -> i32 {
        self.angle_degrees
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn rotate(&mut self, delta_degrees: i32) {
        self.angle_degrees =
            normalize_degrees(self.angle_degrees.wrapping_add(delta_degrees % 360));
    }

    pub fn facing_vector(&self) -> (f64, f64) {
        heading_vector(self.angle_degrees as f64)
    }

    /// Displacement of one step of `distance` toward `direction`.
    pub fn step_vector(&self, direction: MoveDirection, distance: f64) -> (f64, f64) {
        let heading = normalize_degrees(self.angle_degrees + direction.offset_degrees());
        let (dx, dy) = heading_vector(heading as f64);
        (dx * distance, dy * distance)
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}
