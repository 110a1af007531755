use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::entity::{EnemyKind, TileKind};

/// Chunk width in tile units. Every generated chunk spans this many tiles.
pub const CHUNK_WIDTH_TILES: u32 = 25;
/// Vertical extent of a chunk in tile units; generated coordinates must stay
/// inside it. Row 0 is the top of the world, higher rows are lower on screen.
pub const CHUNK_HEIGHT_TILES: u32 = 20;

/// A platform in tile units, relative to its chunk's left edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    #[serde(rename = "tileType")]
    pub tile: TileKind,
}

/// A one-tile entity (coin, gem, spike) in tile units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotSpec {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "enemyType")]
    pub kind: EnemyKind,
}

/// The generator-facing shape of one chunk: tile units, no ids. The
/// streaming manager converts tile coordinates to world pixels and assigns
/// world-unique ids when the chunk is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpec {
    pub platforms: Vec<PlatformSpec>,
    pub coins: Vec<SpotSpec>,
    pub gems: Vec<SpotSpec>,
    pub enemies: Vec<EnemySpec>,
    pub spikes: Vec<SpotSpec>,
}

impl ChunkSpec {
    /// Internal consistency required of every generated chunk: platform
    /// widths positive, all anchor coordinates within chunk bounds.
    pub fn is_consistent(&self) -> bool {
        let in_bounds = |x: u32, y: u32| x < CHUNK_WIDTH_TILES && y < CHUNK_HEIGHT_TILES;
        self.platforms
            .iter()
            .all(|p| p.width > 0 && in_bounds(p.x, p.y))
            && self.coins.iter().all(|c| in_bounds(c.x, c.y))
            && self.gems.iter().all(|g| in_bounds(g.x, g.y))
            && self.enemies.iter().all(|e| in_bounds(e.x, e.y))
            && self.spikes.iter().all(|s| in_bounds(s.x, s.y))
    }
}

/// Outcome of one generation request. `success = false` means the generator
/// fell back to its own synthetic chunks; either way `chunks.len()` must
/// equal the requested count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub chunks: Vec<ChunkSpec>,
}

/// The level-generation collaborator. Implementations run out-of-band (the
/// streaming manager spawns the returned future as a task) and must never
/// block the simulation thread.
pub trait ChunkGenerator: Send + Sync {
    /// Generate `count` chunks starting at the given tile offset.
    fn generate(&self, start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult>;
}
