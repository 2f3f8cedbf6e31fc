use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::box_at;
use crate::map::{GridMap, MapConfig, MapError};

pub const LEVEL_ENV_VAR: &str = "GRIDCAST_LEVEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub x: f64,
    pub y: f64,
    pub angle_degrees: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_sprite_color")]
    pub color: [u8; 4],
}

fn default_sprite_color() -> [u8; 4] {
    [0, 0, 255, 255]
}

/// Everything needed to start a session: the grid, where the player stands and
/// the billboards placed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub map: MapConfig,
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub sprites: Vec<SpriteConfig>,
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("spawn point ({x}, {y}) is outside the map")]
    SpawnOutsideMap { x: f64, y: f64 },
    #[error("spawn point ({x}, {y}) overlaps a wall")]
    SpawnBlocked { x: f64, y: f64 },
    #[error("sprite {index} at ({x}, {y}) is outside the map")]
    SpriteOutsideMap { index: usize, x: f64, y: f64 },
}

impl LevelConfig {
    /// The 10x10 pillar room with the player in the middle facing up.
    pub fn canonical() -> Self {
        Self {
            map: MapConfig::canonical(),
            spawn: SpawnConfig {
                x: 320.0,
                y: 320.0,
                angle_degrees: 90,
            },
            sprites: vec![SpriteConfig {
                x: 320.0,
                y: 160.0,
                color: default_sprite_color(),
            }],
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LevelLoadError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let json_path = error.path().to_string();
            LevelLoadError::Parse {
                json_path,
                source: error.into_inner(),
            }
        })
    }

    pub fn load(path: &Path) -> Result<Self, LevelLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LevelLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Builds the grid and checks that the spawn and every sprite sit on open floor.
    pub fn build_map(&self) -> Result<GridMap, LevelLoadError> {
        let map = GridMap::load(&self.map)?;
        let SpawnConfig { x, y, .. } = self.spawn;
        if !map.contains_point(x, y) {
            return Err(LevelLoadError::SpawnOutsideMap { x, y });
        }
        if map.collides(&box_at(x, y)) {
            return Err(LevelLoadError::SpawnBlocked { x, y });
        }
        for (index, sprite) in self.sprites.iter().enumerate() {
            if !map.contains_point(sprite.x, sprite.y) {
                return Err(LevelLoadError::SpriteOutsideMap {
                    index,
                    x: sprite.x,
                    y: sprite.y,
                });
            }
        }
        Ok(map)
    }
}
