use thiserror::Error;

/// Axis-aligned box in pixel space.
///
/// Extents are closed, inclusive pixel intervals: a box covers columns
/// `x..=x + width - 1` and rows `y..=y + height - 1`. Two boxes that merely
/// share an edge (`a.x + a.width == b.x`) do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CollisionBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn intersects(&self, other: &CollisionBox) -> bool {
        if self.x > other.right() || other.x > self.right() {
            return false;
        }
        if self.y > other.bottom() || other.y > self.bottom() {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxHandle {
    index: u32,
    generation: u32,
}

impl BoxHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("collision box handle {index}@{generation} does not refer to a live box")]
    InvalidHandle { index: u32, generation: u32 },
}

impl CollisionError {
    fn invalid(handle: BoxHandle) -> Self {
        CollisionError::InvalidHandle {
            index: handle.index,
            generation: handle.generation,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    rect: Option<CollisionBox>,
}

/// Owned collection of collision boxes addressed by generational handles.
///
/// Handles are only ever issued by [`CollisionBoxSet::add`], so there is no
/// list anchor a caller could remove. A handle whose box was removed stays
/// invalid even after its slot is reused.
#[derive(Debug, Clone, Default)]
pub struct CollisionBoxSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl CollisionBoxSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: i32, y: i32, width: i32, height: i32) -> BoxHandle {
        let rect = CollisionBox::new(x, y, width, height);
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.rect = Some(rect);
            return BoxHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            rect: Some(rect),
        });
        BoxHandle {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, handle: BoxHandle) -> Result<CollisionBox, CollisionError> {
        let slot = self.live_slot_mut(handle)?;
        let removed = slot.rect.take().ok_or(CollisionError::invalid(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Ok(removed)
    }

    pub fn move_to(&mut self, handle: BoxHandle, x: i32, y: i32) -> Result<(), CollisionError> {
        let slot = self.live_slot_mut(handle)?;
        let rect = slot.rect.as_mut().ok_or(CollisionError::invalid(handle))?;
        rect.x = x;
        rect.y = y;
        Ok(())
    }

    pub fn get(&self, handle: BoxHandle) -> Result<CollisionBox, CollisionError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.rect)
            .ok_or(CollisionError::invalid(handle))
    }

    pub fn contains(&self, handle: BoxHandle) -> bool {
        self.get(handle).is_ok()
    }

    pub fn intersects(&self, a: BoxHandle, b: BoxHandle) -> Result<bool, CollisionError> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        Ok(a.intersects(&b))
    }

    /// True when any live box in the set overlaps `probe`.
    pub fn any_intersecting(&self, probe: &CollisionBox) -> bool {
        self.boxes().any(|rect| rect.intersects(probe))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoxHandle, &CollisionBox)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.rect.as_ref().map(|rect| {
                (
                    BoxHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    rect,
                )
            })
        })
    }

    pub fn boxes(&self) -> impl Iterator<Item = &CollisionBox> + '_ {
        self.slots.iter().filter_map(|slot| slot.rect.as_ref())
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn live_slot_mut(&mut self, handle: BoxHandle) -> Result<&mut Slot, CollisionError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.rect.is_some())
            .ok_or(CollisionError::invalid(handle))
    }
}
