use skyrunner_core::entity::EntityId;
use skyrunner_core::math::Rect;

use crate::config::{COIN_POINTS, GEM_POINTS, SimConfig};
use crate::world::World;

/// Everything the interaction pass discovered this tick. All overlaps are
/// found before any removal is applied; the driver commits the batch.
#[derive(Debug, Default)]
pub struct InteractionOutcome {
    /// Summed point value of collected coins and gems.
    pub points: u64,
    /// Ids of collected coins and gems, to be removed in one batch.
    pub collected: Vec<EntityId>,
    /// The player touched an enemy or spike.
    pub lethal: bool,
}

/// AABB-test every non-platform entity near the player against the resolved
/// player rectangle. A lethal overlap does not short-circuit collection:
/// coins and gems overlapped in the same tick are still gathered.
pub fn scan(world: &World, player_rect: &Rect, cfg: &SimConfig) -> InteractionOutcome {
    let mut outcome = InteractionOutcome::default();
    let tile = cfg.tile_size;
    let margin = tile * 2.0;
    let min_x = player_rect.x - margin;
    let max_x = player_rect.right() + margin;

    let entity_rect = |x: f64, y: f64| Rect::new(x, y, tile, tile);

    for chunk in world.chunks_in_range(min_x, max_x) {
        for coin in &chunk.coins {
            if player_rect.overlaps(&entity_rect(coin.x, coin.y)) {
                outcome.collected.push(coin.id);
                outcome.points += COIN_POINTS;
            }
        }
        for gem in &chunk.gems {
            if player_rect.overlaps(&entity_rect(gem.x, gem.y)) {
                outcome.collected.push(gem.id);
                outcome.points += GEM_POINTS;
            }
        }
        for spike in &chunk.spikes {
            if player_rect.overlaps(&entity_rect(spike.x, spike.y)) {
                outcome.lethal = true;
            }
        }
    }

    // Enemies drift, so they are filtered by position rather than chunk.
    for (_, enemy) in world.enemies().iter() {
        if enemy.x < max_x
            && enemy.x + tile > min_x
            && player_rect.overlaps(&entity_rect(enemy.x, enemy.y))
        {
            outcome.lethal = true;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrunner_core::entity::EnemyKind;
    use skyrunner_core::generation::{EnemySpec, SpotSpec};
    use skyrunner_core::test_helpers::flat_chunk_spec;

    /// Player rect centered on the given tile coordinate.
    fn player_rect_at_tile(x: u32, y: u32, cfg: &SimConfig) -> Rect {
        Rect::new(
            f64::from(x) * cfg.tile_size,
            f64::from(y) * cfg.tile_size,
            cfg.player_width,
            cfg.player_height,
        )
    }

    #[test]
    fn coin_scores_ten() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.coins.push(SpotSpec { x: 4, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(4, 10, &cfg), &cfg);
        assert_eq!(outcome.points, COIN_POINTS);
        assert_eq!(outcome.collected.len(), 1);
        assert!(!outcome.lethal);
    }

    #[test]
    fn gem_scores_fifty() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.gems.push(SpotSpec { x: 6, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(6, 10, &cfg), &cfg);
        assert_eq!(outcome.points, GEM_POINTS);
        assert_eq!(outcome.collected.len(), 1);
    }

    #[test]
    fn two_coins_in_one_tick_both_collected() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.coins.push(SpotSpec { x: 4, y: 10 });
        spec.coins.push(SpotSpec { x: 4, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(4, 10, &cfg), &cfg);
        assert_eq!(outcome.points, 2 * COIN_POINTS);
        assert_eq!(outcome.collected.len(), 2);
    }

    #[test]
    fn enemy_contact_is_lethal() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.enemies.push(EnemySpec {
            x: 4,
            y: 10,
            kind: EnemyKind::Slime,
        });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(4, 10, &cfg), &cfg);
        assert!(outcome.lethal);
    }

    #[test]
    fn spike_contact_is_lethal() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.spikes.push(SpotSpec { x: 4, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(4, 10, &cfg), &cfg);
        assert!(outcome.lethal);
    }

    #[test]
    fn lethal_overlap_does_not_short_circuit_collection() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.coins.push(SpotSpec { x: 4, y: 10 });
        spec.spikes.push(SpotSpec { x: 4, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(4, 10, &cfg), &cfg);
        assert!(outcome.lethal);
        assert_eq!(outcome.points, COIN_POINTS, "coin still collected");
        assert_eq!(outcome.collected.len(), 1);
    }

    #[test]
    fn distant_entities_ignored() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.coins.push(SpotSpec { x: 20, y: 10 });
        world.append_chunk(0, &spec, &cfg);

        let outcome = scan(&world, &player_rect_at_tile(2, 10, &cfg), &cfg);
        assert_eq!(outcome.points, 0);
        assert!(outcome.collected.is_empty());
    }
}
