use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{CollisionBox, CollisionBoxSet};

pub const CANONICAL_MAP_WIDTH: u32 = 10;
pub const CANONICAL_MAP_HEIGHT: u32 = 10;
pub const CANONICAL_TILE_UNIT: u32 = 64;

#[rustfmt::skip]
pub const CANONICAL_TILES: [u8; 100] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 1, 0, 0, 1, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 1, 0, 0, 1, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
}

impl Tile {
    pub fn from_raw(raw: u8) -> Option<Tile> {
        match raw {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

/// Loadable description of a tile grid: `tiles` is row-major, `row * width + col`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub unit: u32,
    pub tiles: Vec<u8>,
}

impl MapConfig {
    pub fn canonical() -> Self {
        Self {
            width: CANONICAL_MAP_WIDTH,
            height: CANONICAL_MAP_HEIGHT,
            unit: CANONICAL_TILE_UNIT,
            tiles: CANONICAL_TILES.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("tile unit must be greater than zero")]
    ZeroUnit,
    #[error("map of {width}x{height} tiles at unit {unit} exceeds the i32 pixel range")]
    TooLarge { width: u32, height: u32, unit: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("invalid tile value {value} at index {index}; expected 0 or 1")]
    InvalidTile { index: usize, value: u8 },
}

/// Static tile grid plus the collision boxes derived from its walls.
///
/// Tile (col,row) covers world pixels `col*unit..(col+1)*unit` horizontally and
/// `row*unit..(row+1)*unit` vertically.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: u32,
    height: u32,
    unit: u32,
    tiles: Vec<Tile>,
    static_boxes: CollisionBoxSet,
}

impl GridMap {
    pub fn load(config: &MapConfig) -> Result<Self, MapError> {
        if config.width == 0 || config.height == 0 {
            return Err(MapError::ZeroDimension {
                width: config.width,
                height: config.height,
            });
        }
        if config.unit == 0 {
            return Err(MapError::ZeroUnit);
        }
        let limit = i32::MAX as u64;
        let unit = u64::from(config.unit);
        if u64::from(config.width) * unit > limit || u64::from(config.height) * unit > limit {
            return Err(MapError::TooLarge {
                width: config.width,
                height: config.height,
                unit: config.unit,
            });
        }
        let expected = config.width as usize * config.height as usize;
        let actual = config.tiles.len();
        if expected != actual {
            return Err(MapError::TileCountMismatch { expected, actual });
        }

        let tiles = config
            .tiles
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Tile::from_raw(value).ok_or(MapError::InvalidTile { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_tiles(config.width, config.height, config.unit, tiles))
    }

    pub fn canonical() -> Self {
        let tiles = CANONICAL_TILES
            .iter()
            .map(|&value| if value == 0 { Tile::Empty } else { Tile::Wall })
            .collect();
        Self::from_tiles(
            CANONICAL_MAP_WIDTH,
            CANONICAL_MAP_HEIGHT,
            CANONICAL_TILE_UNIT,
            tiles,
        )
    }

    fn from_tiles(width: u32, height: u32, unit: u32, tiles: Vec<Tile>) -> Self {
        let mut map = Self {
            width,
            height,
            unit,
            tiles,
            static_boxes: CollisionBoxSet::new(),
        };
        map.static_boxes = build_static_collision(&map);
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    /// World extent in pixels, `(width * unit, height * unit)`.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width * self.unit, self.height * self.unit)
    }

    pub fn index_of(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Tile at grid coordinates; `None` means the coordinates are outside the map.
    pub fn tile(&self, col: i64, row: i64) -> Option<Tile> {
        self.index_of(col, row)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Tile under a world-space point; `None` means "out of map", never a clamped tile.
    pub fn tile_at(&self, world_x: f64, world_y: f64) -> Option<Tile> {
        if !world_x.is_finite() || !world_y.is_finite() {
            return None;
        }
        let unit = self.unit as f64;
        let col = (world_x / unit).floor() as i64;
        let row = (world_y / unit).floor() as i64;
        self.tile(col, row)
    }

    pub fn contains_point(&self, world_x: f64, world_y: f64) -> bool {
        self.tile_at(world_x, world_y).is_some()
    }

    pub fn tile_center(&self, col: i64, row: i64) -> Option<(f64, f64)> {
        self.index_of(col, row)?;
        let unit = self.unit as f64;
        Some(((col as f64 + 0.5) * unit, (row as f64 + 0.5) * unit))
    }

    pub fn walls(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_wall())
            .map(move |(index, _)| ((index % width) as i64, (index / width) as i64))
    }

    pub fn static_boxes(&self) -> &CollisionBoxSet {
        &self.static_boxes
    }

    /// True when `probe` overlaps any wall tile's box.
    pub fn collides(&self, probe: &CollisionBox) -> bool {
        self.static_boxes.any_intersecting(probe)
    }
}

/// One static box per wall tile, positioned at `(col*unit, row*unit, unit, unit)`.
pub fn build_static_collision(map: &GridMap) -> CollisionBoxSet {
    let unit = map.unit as i32;
    let mut boxes = CollisionBoxSet::new();
    for (col, row) in map.walls() {
        boxes.add(col as i32 * unit, row as i32 * unit, unit, unit);
    }
    boxes
}
