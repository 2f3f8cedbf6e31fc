#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 * 0.5, self.height as f64 * 0.5)
    }
}

/// Top-down scroll offset that centers `focus` in the viewport without
/// scrolling past the map edges. Axes where the map fits entirely get 0.
pub fn overlay_offset(
    focus: (f64, f64),
    map_size_px: (u32, u32),
    viewport: Viewport,
) -> (i32, i32) {
    (
        axis_offset(focus.0, map_size_px.0, viewport.width),
        axis_offset(focus.1, map_size_px.1, viewport.height),
    )
}

/// World pixel to screen pixel for the top-down view.
pub fn world_to_screen(world: (f64, f64), offset: (i32, i32)) -> (i32, i32) {
    (
        world.0.floor() as i32 - offset.0,
        world.1.floor() as i32 - offset.1,
    )
}

fn axis_offset(focus: f64, extent: u32, view: u32) -> i32 {
    if extent <= view {
        return 0;
    }
    let max_offset = (extent - view) as f64;
    let centered = focus - view as f64 * 0.5;
    centered.round().clamp(0.0, max_offset) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 640,
        height: 480,
    };

    #[test]
    fn map_narrower_than_viewport_is_not_scrolled() {
        let (x, _) = overlay_offset((320.0, 320.0), (640, 640), VIEWPORT);
        assert_eq!(x, 0);
    }

    #[test]
    fn focus_is_centered_when_room_allows() {
        let (_, y) = overlay_offset((320.0, 320.0), (640, 640), VIEWPORT);
        assert_eq!(y, 80);
        assert_eq!(world_to_screen((320.0, 320.0), (0, 80)), (320, 240));
    }

    #[test]
    fn offset_clamps_at_map_edges() {
        assert_eq!(overlay_offset((10.0, 10.0), (2000, 2000), VIEWPORT), (0, 0));
        assert_eq!(
            overlay_offset((1990.0, 1990.0), (2000, 2000), VIEWPORT),
            (1360, 1520)
        );
    }

    #[test]
    fn viewport_center_is_half_extent() {
        assert_eq!(VIEWPORT.center(), (320.0, 240.0));
    }
}
