#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scales the color channels by `factor` (clamped to `0..=1`), keeping alpha.
    pub fn shaded(self, factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scale = |channel: u8| (channel as f64 * factor).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

/// Target for flat-colored primitives.
///
/// Rectangles are half-open: `x0..x1` by `y0..y1`. Lines include both endpoints.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    FillRect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgba,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgba,
    },
}

/// Records draw calls in issue order instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Surface for CommandList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }
}

/// RGBA8 frame buffer view with clipping and source-over blending.
pub struct PixelSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelSurface<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        let color = color.to_array();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn blend_pixel_clipped(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(pixel_offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(end) = byte_offset.checked_add(4) else {
            return;
        };
        if end > self.frame.len() {
            return;
        }

        let dst = &mut self.frame[byte_offset..end];
        if color.a == 255 {
            dst.copy_from_slice(&color.to_array());
            return;
        }
        if color.a == 0 {
            return;
        }
        let alpha = color.a as u32;
        let blend = |src: u8, dst: u8| -> u8 {
            ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
        };
        dst[0] = blend(color.r, dst[0]);
        dst[1] = blend(color.g, dst[1]);
        dst[2] = blend(color.b, dst[2]);
        dst[3] = 255;
    }
}

impl Surface for PixelSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let left = x0.min(x1).max(0);
        let right = x0.max(x1).min(self.width as i32);
        let top = y0.min(y1).max(0);
        let bottom = y0.max(y1).min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend_pixel_clipped(x, y, color);
            }
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.blend_pixel_clipped(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn fill_rect_is_half_open_and_clipped() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut surface = PixelSurface::new(&mut frame, 4, 4);
        surface.fill_rect(-2, 1, 2, 9, Rgba::opaque(255, 0, 0));

        assert_eq!(pixel(&frame, 4, 0, 1), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 4, 1, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 4, 2, 1), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, 4, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_color_blends_over_existing_pixels() {
        let mut frame = vec![0u8; 2 * 2 * 4];
        let mut surface = PixelSurface::new(&mut frame, 2, 2);
        surface.clear(Rgba::opaque(0, 0, 200));
        surface.fill_rect(0, 0, 1, 1, Rgba::new(255, 255, 0, 51));

        assert_eq!(pixel(&frame, 2, 0, 0), [51, 51, 160, 255]);
        assert_eq!(pixel(&frame, 2, 1, 1), [0, 0, 200, 255]);
    }

    #[test]
    fn line_includes_both_endpoints() {
        let mut frame = vec![0u8; 5 * 5 * 4];
        let mut surface = PixelSurface::new(&mut frame, 5, 5);
        surface.draw_line(0, 0, 4, 4, Rgba::opaque(0, 255, 0));

        for i in 0..5 {
            assert_eq!(pixel(&frame, 5, i, i), [0, 255, 0, 255]);
        }
        assert_eq!(pixel(&frame, 5, 4, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn line_leaving_the_frame_is_clipped_without_panic() {
        let mut frame = vec![0u8; 3 * 3 * 4];
        let mut surface = PixelSurface::new(&mut frame, 3, 3);
        surface.draw_line(-10, 1, 20, 1, Rgba::opaque(9, 9, 9));

        assert_eq!(pixel(&frame, 3, 0, 1), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 3, 2, 1), [9, 9, 9, 255]);
    }

    #[test]
    fn command_list_records_calls_in_order() {
        let mut list = CommandList::new(640, 480);
        list.fill_rect(0, 0, 10, 10, Rgba::opaque(1, 2, 3));
        list.draw_line(0, 0, 5, 5, Rgba::new(255, 255, 0, 50));

        assert_eq!(list.size(), (640, 480));
        assert_eq!(
            list.commands(),
            &[
                DrawCommand::FillRect {
                    x0: 0,
                    y0: 0,
                    x1: 10,
                    y1: 10,
                    color: Rgba::opaque(1, 2, 3),
                },
                DrawCommand::Line {
                    x0: 0,
                    y0: 0,
                    x1: 5,
                    y1: 5,
                    color: Rgba::new(255, 255, 0, 50),
                },
            ]
        );
    }

    #[test]
    fn shaded_scales_channels_but_keeps_alpha() {
        let color = Rgba::new(200, 100, 50, 128);

        assert_eq!(color.shaded(0.5), Rgba::new(100, 50, 25, 128));
        assert_eq!(color.shaded(2.0), color);
        assert_eq!(color.shaded(f64::NAN), Rgba::new(0, 0, 0, 128));
    }
}
