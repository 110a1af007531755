use std::collections::HashSet;

use skyrunner_core::entity::{
    Chunk, Coin, Enemy, EntityId, Gem, IdAllocator, Platform, Projectile, Spike,
};
use skyrunner_core::generation::ChunkSpec;
use skyrunner_core::math::Vec2;
use skyrunner_core::slot::{Handle, SlotArena};

use crate::config::{PATROL_SPEED, SimConfig};

/// The entity store: every world entity, grouped into ordered chunks, plus
/// flat arenas for the entities that move and get destroyed cross-subsystem
/// (enemies, projectiles). Chunks are appended in strictly increasing
/// `start_x` order and never reordered or removed.
#[derive(Debug)]
pub struct World {
    chunks: Vec<Chunk>,
    enemies: SlotArena<Enemy>,
    projectiles: SlotArena<Projectile>,
    ids: IdAllocator,
    chunk_width_px: f64,
}

impl World {
    pub fn new(cfg: &SimConfig) -> Self {
        Self {
            chunks: Vec::new(),
            enemies: SlotArena::new(),
            projectiles: SlotArena::new(),
            ids: IdAllocator::new(),
            chunk_width_px: cfg.chunk_width_px(),
        }
    }

    /// Drop all entities and start a fresh id sequence for a new run.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.ids = IdAllocator::new();
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Right edge of the loaded world, if any chunk is loaded.
    pub fn last_chunk_end(&self) -> Option<f64> {
        self.chunks.last().map(|c| c.start_x + self.chunk_width_px)
    }

    /// Convert a tile-unit chunk spec to world pixels, assign fresh ids, and
    /// append it to the world tail.
    pub fn append_chunk(&mut self, start_tile: i64, spec: &ChunkSpec, cfg: &SimConfig) {
        let tile = cfg.tile_size;
        let start_x = start_tile as f64 * tile;
        debug_assert!(
            self.chunks.last().is_none_or(|c| c.start_x < start_x),
            "chunk start offsets must be strictly increasing"
        );

        let mut chunk = Chunk {
            start_x,
            ..Default::default()
        };

        for p in &spec.platforms {
            chunk.platforms.push(Platform {
                id: self.ids.next_id(),
                x: start_x + f64::from(p.x) * tile,
                y: f64::from(p.y) * tile,
                width: f64::from(p.width) * tile,
                tile: p.tile,
            });
        }
        for c in &spec.coins {
            chunk.coins.push(Coin {
                id: self.ids.next_id(),
                x: start_x + f64::from(c.x) * tile,
                y: f64::from(c.y) * tile,
            });
        }
        for g in &spec.gems {
            chunk.gems.push(Gem {
                id: self.ids.next_id(),
                x: start_x + f64::from(g.x) * tile,
                y: f64::from(g.y) * tile,
            });
        }
        for s in &spec.spikes {
            chunk.spikes.push(Spike {
                id: self.ids.next_id(),
                x: start_x + f64::from(s.x) * tile,
                y: f64::from(s.y) * tile,
            });
        }
        for e in &spec.enemies {
            let x = start_x + f64::from(e.x) * tile;
            let y = f64::from(e.y) * tile;
            let velocity = if e.kind.hovers() {
                Vec2::ZERO
            } else {
                Vec2::new(PATROL_SPEED, 0.0)
            };
            let handle = self.enemies.insert(Enemy {
                id: self.ids.next_id(),
                x,
                y,
                kind: e.kind,
                velocity,
                spawn_origin: Vec2::new(x, y),
            });
            chunk.enemies.push(handle);
        }

        self.chunks.push(chunk);
    }

    /// Chunks whose horizontal extent may intersect `[min_x, max_x]`. Chunk
    /// starts are strictly increasing, so both bounds come from binary
    /// search; the lower bound is widened by a chunk so platforms that spill
    /// past their chunk's right edge are still found.
    pub fn chunks_in_range(&self, min_x: f64, max_x: f64) -> &[Chunk] {
        let hi = self.chunks.partition_point(|c| c.start_x < max_x);
        let lo = self
            .chunks
            .partition_point(|c| c.start_x + 2.0 * self.chunk_width_px <= min_x);
        let lo = lo.min(hi);
        &self.chunks[lo..hi]
    }

    /// Platforms near the given x-range, in storage order.
    pub fn platforms_near(&self, min_x: f64, max_x: f64) -> Vec<&Platform> {
        self.chunks_in_range(min_x, max_x)
            .iter()
            .flat_map(|c| c.platforms.iter())
            .collect()
    }

    pub fn enemies(&self) -> &SlotArena<Enemy> {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut SlotArena<Enemy> {
        &mut self.enemies
    }

    pub fn projectiles(&self) -> &SlotArena<Projectile> {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut SlotArena<Projectile> {
        &mut self.projectiles
    }

    pub fn spawn_projectile(&mut self, x: f64, y: f64, velocity: Vec2) -> Handle {
        let id = self.ids.next_id();
        self.projectiles.insert(Projectile { id, x, y, velocity })
    }

    pub fn remove_projectile(&mut self, handle: Handle) -> Option<Projectile> {
        self.projectiles.remove(handle)
    }

    /// Remove marked coins and gems from their owning chunks in one batch.
    pub fn remove_collectibles(&mut self, ids: &HashSet<EntityId>) {
        if ids.is_empty() {
            return;
        }
        for chunk in &mut self.chunks {
            chunk.coins.retain(|c| !ids.contains(&c.id));
            chunk.gems.retain(|g| !ids.contains(&g.id));
        }
    }

    /// Destroy an enemy, detaching its handle from the owning chunk.
    pub fn kill_enemy(&mut self, handle: Handle) -> Option<Enemy> {
        let enemy = self.enemies.remove(handle)?;
        for chunk in &mut self.chunks {
            chunk.enemies.retain(|&h| h != handle);
        }
        Some(enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrunner_core::entity::EnemyKind;
    use skyrunner_core::generation::{CHUNK_WIDTH_TILES, EnemySpec, SpotSpec};
    use skyrunner_core::test_helpers::{flat_chunk_spec, flat_chunk_spec_with_coin};

    fn world_with_flat_chunks(n: usize) -> (World, SimConfig) {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        for i in 0..n {
            world.append_chunk(i as i64 * CHUNK_WIDTH_TILES as i64, &flat_chunk_spec(), &cfg);
        }
        (world, cfg)
    }

    #[test]
    fn append_converts_tiles_to_pixels() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        world.append_chunk(25, &flat_chunk_spec_with_coin(3, 9), &cfg);

        let chunk = &world.chunks()[0];
        assert_eq!(chunk.start_x, 25.0 * cfg.tile_size);
        assert_eq!(chunk.platforms[0].x, 25.0 * cfg.tile_size);
        assert_eq!(chunk.platforms[0].y, 13.0 * cfg.tile_size);
        assert_eq!(
            chunk.platforms[0].width,
            f64::from(CHUNK_WIDTH_TILES) * cfg.tile_size
        );
        assert_eq!(chunk.coins[0].x, (25.0 + 3.0) * cfg.tile_size);
        assert_eq!(chunk.coins[0].y, 9.0 * cfg.tile_size);
    }

    #[test]
    fn ids_unique_across_chunks() {
        let (world, _) = world_with_flat_chunks(4);
        let mut seen = HashSet::new();
        for chunk in world.chunks() {
            for p in &chunk.platforms {
                assert!(seen.insert(p.id), "duplicate id {}", p.id);
            }
        }
    }

    #[test]
    fn last_chunk_end_tracks_tail() {
        let (world, cfg) = world_with_flat_chunks(3);
        assert_eq!(world.last_chunk_end(), Some(3.0 * cfg.chunk_width_px()));
    }

    #[test]
    fn platforms_near_selects_by_range() {
        let (world, cfg) = world_with_flat_chunks(4);
        let w = cfg.chunk_width_px();
        // Query inside the third chunk only.
        let near = world.platforms_near(2.0 * w + 10.0, 2.0 * w + 100.0);
        assert!(!near.is_empty());
        assert!(near.iter().any(|p| p.x == 2.0 * w));
        // Far beyond the loaded world: nothing.
        assert!(world.platforms_near(100.0 * w, 101.0 * w).is_empty());
    }

    #[test]
    fn remove_collectibles_removes_only_marked_ids() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec_with_coin(3, 9);
        spec.coins.push(SpotSpec { x: 5, y: 9 });
        spec.gems.push(SpotSpec { x: 7, y: 9 });
        world.append_chunk(0, &spec, &cfg);

        let first_coin = world.chunks()[0].coins[0].id;
        let gem = world.chunks()[0].gems[0].id;
        let marked: HashSet<_> = [first_coin, gem].into_iter().collect();
        world.remove_collectibles(&marked);

        let chunk = &world.chunks()[0];
        assert_eq!(chunk.coins.len(), 1);
        assert_ne!(chunk.coins[0].id, first_coin);
        assert!(chunk.gems.is_empty());
    }

    #[test]
    fn kill_enemy_detaches_from_chunk() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.enemies.push(EnemySpec {
            x: 6,
            y: 12,
            kind: EnemyKind::Slime,
        });
        world.append_chunk(0, &spec, &cfg);

        let handle = world.chunks()[0].enemies[0];
        let killed = world.kill_enemy(handle).expect("enemy exists");
        assert_eq!(killed.kind, EnemyKind::Slime);
        assert!(world.chunks()[0].enemies.is_empty());
        assert!(world.enemies().is_empty());
        // A second kill on the same handle is a no-op.
        assert!(world.kill_enemy(handle).is_none());
    }

    #[test]
    fn patrol_enemies_spawn_with_velocity_hover_without() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.enemies.push(EnemySpec {
            x: 4,
            y: 12,
            kind: EnemyKind::Ladybug,
        });
        spec.enemies.push(EnemySpec {
            x: 8,
            y: 8,
            kind: EnemyKind::Fly,
        });
        world.append_chunk(0, &spec, &cfg);

        let enemies: Vec<_> = world.enemies().iter().map(|(_, e)| e.clone()).collect();
        let ladybug = enemies.iter().find(|e| e.kind == EnemyKind::Ladybug).unwrap();
        let fly = enemies.iter().find(|e| e.kind == EnemyKind::Fly).unwrap();
        assert_eq!(ladybug.velocity.x, PATROL_SPEED);
        assert_eq!(fly.velocity, Vec2::ZERO);
        assert_eq!(fly.spawn_origin, Vec2::new(fly.x, fly.y));
    }

    #[test]
    fn reset_restarts_id_sequence() {
        let (mut world, cfg) = world_with_flat_chunks(2);
        world.reset();
        assert_eq!(world.chunk_count(), 0);
        world.append_chunk(0, &flat_chunk_spec(), &cfg);
        assert_eq!(world.chunks()[0].platforms[0].id, 1);
    }
}
