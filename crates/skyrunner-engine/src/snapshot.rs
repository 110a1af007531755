use serde::{Deserialize, Serialize};

use skyrunner_core::entity::{Coin, Enemy, Gem, Platform, Projectile, Spike};

use crate::config::SimConfig;
use crate::player::PlayerState;
use crate::world::World;

/// Read-only, camera-culled view handed to the rendering collaborator each
/// frame. The renderer never writes back into simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub score: u64,
    pub camera_x: f64,
    pub player: PlayerState,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub gems: Vec<Gem>,
    pub spikes: Vec<Spike>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// User-visible generation warning, if any fallback occurred this run.
    pub warning: Option<String>,
}

#[derive(Debug)]
pub enum SnapshotError {
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "snapshot encode error: {e}"),
            Self::Decode(e) => write!(f, "snapshot decode error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Encode a snapshot for an out-of-process renderer.
pub fn encode(snapshot: &RenderSnapshot) -> Result<Vec<u8>, SnapshotError> {
    rmp_serde::to_vec(snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<RenderSnapshot, SnapshotError> {
    rmp_serde::from_slice(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
}

/// Assemble the camera-culled view: everything within one tile of the
/// viewport, in world order.
pub fn build(
    world: &World,
    player: &PlayerState,
    score: u64,
    camera_x: f64,
    warning: Option<String>,
    cfg: &SimConfig,
) -> RenderSnapshot {
    let tile = cfg.tile_size;
    let left = camera_x - tile;
    let right = camera_x + cfg.viewport_width + tile;
    let visible_tile = |x: f64| x + tile > left && x < right;

    let mut snapshot = RenderSnapshot {
        score,
        camera_x,
        player: player.clone(),
        platforms: Vec::new(),
        coins: Vec::new(),
        gems: Vec::new(),
        spikes: Vec::new(),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        warning,
    };

    for chunk in world.chunks_in_range(left, right) {
        for p in &chunk.platforms {
            if p.x < right && p.x + p.width > left {
                snapshot.platforms.push(p.clone());
            }
        }
        snapshot
            .coins
            .extend(chunk.coins.iter().filter(|c| visible_tile(c.x)).cloned());
        snapshot
            .gems
            .extend(chunk.gems.iter().filter(|g| visible_tile(g.x)).cloned());
        snapshot
            .spikes
            .extend(chunk.spikes.iter().filter(|s| visible_tile(s.x)).cloned());
    }
    snapshot.enemies.extend(
        world
            .enemies()
            .iter()
            .filter(|(_, e)| visible_tile(e.x))
            .map(|(_, e)| e.clone()),
    );
    snapshot.projectiles.extend(
        world
            .projectiles()
            .iter()
            .filter(|(_, p)| visible_tile(p.x))
            .map(|(_, p)| p.clone()),
    );

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrunner_core::generation::{CHUNK_WIDTH_TILES, SpotSpec};
    use skyrunner_core::math::Vec2;
    use skyrunner_core::test_helpers::flat_chunk_spec;

    fn many_chunk_world() -> (World, SimConfig) {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        for i in 0..10 {
            let mut spec = flat_chunk_spec();
            spec.coins.push(SpotSpec { x: 2, y: 10 });
            world.append_chunk(i * i64::from(CHUNK_WIDTH_TILES), &spec, &cfg);
        }
        (world, cfg)
    }

    #[test]
    fn culls_entities_outside_viewport() {
        let (world, cfg) = many_chunk_world();
        let player = PlayerState::grounded_spawn(Vec2::new(100.0, 578.0));
        let snapshot = build(&world, &player, 0, 0.0, None, &cfg);

        // 10 chunks span 12000 px; the viewport sees ~1280 of them.
        assert!(snapshot.platforms.len() < 4);
        assert!(snapshot.coins.len() < 4);
        assert!(!snapshot.platforms.is_empty());
        for coin in &snapshot.coins {
            assert!(coin.x < cfg.viewport_width + cfg.tile_size);
        }
    }

    #[test]
    fn far_camera_sees_different_chunks() {
        let (world, cfg) = many_chunk_world();
        let player = PlayerState::grounded_spawn(Vec2::new(100.0, 578.0));
        let far_x = 8.0 * cfg.chunk_width_px();
        let snapshot = build(&world, &player, 0, far_x, None, &cfg);
        assert!(snapshot.platforms.iter().all(|p| p.x + p.width > far_x - cfg.tile_size));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let (world, cfg) = many_chunk_world();
        let player = PlayerState::grounded_spawn(Vec2::new(100.0, 578.0));
        let snapshot = build(
            &world,
            &player,
            120,
            0.0,
            Some("fallback in use".to_string()),
            &cfg,
        );
        let bytes = encode(&snapshot).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&[0xFF, 0x00, 0xAB]).is_err());
    }
}
