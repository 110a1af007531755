use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::slot::Handle;

/// Unique entity identifier, monotonic for the life of a run.
pub type EntityId = u64;

/// Hands out ids that are unique across the whole world for one run.
/// Removed ids are never reissued.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Visual style of a platform tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Grass,
    Dirt,
    Stone,
    Snow,
    Sand,
    Castle,
}

/// Enemy species. Slime and Ladybug patrol the ground; Fly hovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Slime,
    Fly,
    Ladybug,
}

impl EnemyKind {
    pub fn hovers(self) -> bool {
        matches!(self, EnemyKind::Fly)
    }
}

/// A solid surface the player can stand on. One tile tall, `width` pixels wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub tile: TileKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub kind: EnemyKind,
    pub velocity: Vec2,
    /// Position at spawn; patrol and hover motion oscillate around it.
    pub spawn_origin: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub velocity: Vec2,
}

/// A contiguous slice of the world. `start_x` is strictly increasing across
/// the loaded sequence; entities were placed within
/// `[start_x, start_x + chunk_width_px)` at creation time, though enemies may
/// later drift outside that range. Enemies live in the world's arena and are
/// referenced here by handle so a kill can detach them from the owning chunk.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub start_x: f64,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub gems: Vec<Gem>,
    pub spikes: Vec<Spike>,
    pub enemies: Vec<Handle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_unique() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn only_fly_hovers() {
        assert!(EnemyKind::Fly.hovers());
        assert!(!EnemyKind::Slime.hovers());
        assert!(!EnemyKind::Ladybug.hovers());
    }
}
