use std::vec::Drain;

use tracing::warn;

use super::surface::{Rgba, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
}

/// One flat-colored primitive tagged with a paint-order depth.
///
/// `depth` only orders drawing; larger means farther and is painted first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawElement {
    pub depth: f64,
    pub primitive: Primitive,
    pub color: Rgba,
}

impl DrawElement {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self.primitive {
            Primitive::Rect {
                x,
                y,
                width,
                height,
            } => surface.fill_rect(
                x,
                y,
                x.saturating_add(width),
                y.saturating_add(height),
                self.color,
            ),
            Primitive::Line { x0, y0, x1, y1 } => surface.draw_line(x0, y0, x1, y1, self.color),
        }
    }
}

/// Painter's-algorithm list kept sorted by descending depth.
///
/// Equal depths keep insertion order. Draining consumes every element, so a
/// frame can never start populating on top of the previous frame's leftovers.
#[derive(Debug, Default)]
pub struct RenderQueue {
    elements: Vec<DrawElement>,
    frame: u64,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame. Elements left over from an undrained frame are discarded.
    pub fn begin_frame(&mut self) -> u64 {
        if !self.elements.is_empty() {
            warn!(
                frame = self.frame,
                stale_elements = self.elements.len(),
                "render_queue_not_drained"
            );
            self.elements.clear();
        }
        self.frame = self.frame.wrapping_add(1);
        self.frame
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Inserts after every element whose depth is `>= depth`. NaN sorts as farthest.
    pub fn insert(&mut self, depth: f64, primitive: Primitive, color: Rgba) {
        let depth = if depth.is_nan() { f64::INFINITY } else { depth };
        let position = self
            .elements
            .partition_point(|element| element.depth >= depth);
        self.elements.insert(
            position,
            DrawElement {
                depth,
                primitive,
                color,
            },
        );
    }

    pub fn insert_rect(
        &mut self,
        depth: f64,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Rgba,
    ) {
        self.insert(
            depth,
            Primitive::Rect {
                x,
                y,
                width,
                height,
            },
            color,
        );
    }

    pub fn insert_line(&mut self, depth: f64, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        self.insert(depth, Primitive::Line { x0, y0, x1, y1 }, color);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawElement> + '_ {
        self.elements.iter()
    }

    /// Removes every element, farthest first. Dropping the iterator early still empties the queue.
    pub fn drain(&mut self) -> Drain<'_, DrawElement> {
        self.elements.drain(..)
    }

    /// Draws every element back to front and leaves the queue empty.
    pub fn drain_and_draw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut drawn = 0;
        for element in self.drain() {
            element.draw(surface);
            drawn += 1;
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CommandList, DrawCommand};

    fn rect(x: i32) -> Primitive {
        Primitive::Rect {
            x,
            y: 0,
            width: 1,
            height: 1,
        }
    }

    fn depths(queue: &RenderQueue) -> Vec<f64> {
        queue.iter().map(|element| element.depth).collect()
    }

    #[test]
    fn traversal_yields_non_increasing_depths() {
        let mut queue = RenderQueue::new();
        for (i, depth) in [5.0, 1.0, 9.0, 3.0, 9.0, 0.5, 7.25, 1.0].iter().enumerate() {
            queue.insert(*depth, rect(i as i32), Rgba::default());
        }

        let ordered = depths(&queue);
        assert_eq!(ordered, vec![9.0, 9.0, 7.25, 5.0, 3.0, 1.0, 1.0, 0.5]);
        assert!(ordered.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn equal_depths_keep_insertion_order() {
        let mut queue = RenderQueue::new();
        queue.insert(2.0, rect(0), Rgba::default());
        queue.insert(4.0, rect(1), Rgba::default());
        queue.insert(2.0, rect(2), Rgba::default());
        queue.insert(4.0, rect(3), Rgba::default());

        let order: Vec<Primitive> = queue.iter().map(|element| element.primitive).collect();
        assert_eq!(order, vec![rect(1), rect(3), rect(0), rect(2)]);
    }

    #[test]
    fn inserting_farther_than_everything_goes_to_front() {
        let mut queue = RenderQueue::new();
        queue.insert(1.0, rect(0), Rgba::default());
        queue.insert(2.0, rect(1), Rgba::default());
        queue.insert(f64::INFINITY, rect(2), Rgba::default());
        queue.insert(f64::NAN, rect(3), Rgba::default());

        let order: Vec<Primitive> = queue.iter().map(|element| element.primitive).collect();
        assert_eq!(order, vec![rect(2), rect(3), rect(1), rect(0)]);
    }

    #[test]
    fn drain_and_draw_paints_back_to_front_and_empties_queue() {
        let mut queue = RenderQueue::new();
        let near = Rgba::opaque(255, 0, 0);
        let far = Rgba::opaque(0, 0, 255);
        queue.insert_rect(1.0, 0, 0, 10, 10, near);
        queue.insert_line(50.0, 0, 0, 3, 3, far);

        let mut surface = CommandList::new(16, 16);
        let drawn = queue.drain_and_draw(&mut surface);

        assert_eq!(drawn, 2);
        assert!(queue.is_empty());
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Line {
                    x0: 0,
                    y0: 0,
                    x1: 3,
                    y1: 3,
                    color: far,
                },
                DrawCommand::FillRect {
                    x0: 0,
                    y0: 0,
                    x1: 10,
                    y1: 10,
                    color: near,
                },
            ]
        );
    }

    #[test]
    fn dropping_a_partial_drain_still_empties_queue() {
        let mut queue = RenderQueue::new();
        for i in 0..4 {
            queue.insert(i as f64, rect(i), Rgba::default());
        }

        let first = queue.drain().next().expect("one element");
        assert_eq!(first.depth, 3.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn begin_frame_discards_undrained_elements() {
        let mut queue = RenderQueue::new();
        let first = queue.begin_frame();
        queue.insert(1.0, rect(0), Rgba::default());

        let second = queue.begin_frame();
        assert_eq!(second, first + 1);
        assert!(queue.is_empty());
        assert_eq!(queue.frame(), second);
    }
}
