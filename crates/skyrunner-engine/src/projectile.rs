use skyrunner_core::math::{Rect, Vec2};
use skyrunner_core::slot::Handle;

use crate::config::{
    KILL_POINTS, PROJECTILE_HEIGHT, PROJECTILE_WIDTH, SimConfig,
};
use crate::player::{Facing, PlayerState};
use crate::world::World;

/// Spawn one projectile at the player's center, travelling in the facing
/// direction.
pub fn spawn(world: &mut World, player: &PlayerState, cfg: &SimConfig) -> Handle {
    let x = player.position.x + cfg.player_width / 2.0 - PROJECTILE_WIDTH / 2.0;
    let y = player.position.y + cfg.player_height / 2.0 - PROJECTILE_HEIGHT / 2.0;
    let speed = match player.facing {
        Facing::Right => cfg.projectile_speed,
        Facing::Left => -cfg.projectile_speed,
    };
    world.spawn_projectile(x, y, Vec2::new(speed, 0.0))
}

/// Advance every live projectile by its dt-scaled velocity.
pub fn advance(world: &mut World, dt: f64) {
    for (_, p) in world.projectiles_mut().iter_mut() {
        p.x += p.velocity.x * dt;
    }
}

/// Projectile/enemy hits discovered this tick. Applied as one batch by the
/// driver, matching the interaction pass.
#[derive(Debug, Default)]
pub struct CombatOutcome {
    pub spent_projectiles: Vec<Handle>,
    pub killed_enemies: Vec<Handle>,
    pub points: u64,
}

/// Test every live projectile against every live enemy. Multiple
/// simultaneous hits in one tick are all honored independently; each enemy
/// kill is worth a fixed bounty.
pub fn collide(world: &World, cfg: &SimConfig) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    let tile = cfg.tile_size;

    for (ph, projectile) in world.projectiles().iter() {
        let projectile_rect = Rect::new(
            projectile.x,
            projectile.y,
            PROJECTILE_WIDTH,
            PROJECTILE_HEIGHT,
        );
        for (eh, enemy) in world.enemies().iter() {
            let enemy_rect = Rect::new(enemy.x, enemy.y, tile, tile);
            if !projectile_rect.overlaps(&enemy_rect) {
                continue;
            }
            if !outcome.spent_projectiles.contains(&ph) {
                outcome.spent_projectiles.push(ph);
            }
            if !outcome.killed_enemies.contains(&eh) {
                outcome.killed_enemies.push(eh);
                outcome.points += KILL_POINTS;
            }
        }
    }

    outcome
}

/// Prune projectiles that left the camera viewport on either side. Lifetime
/// is purely viewport-relative, never time-based.
pub fn cull_offscreen(world: &mut World, camera_x: f64, cfg: &SimConfig) {
    let left = camera_x;
    let right = camera_x + cfg.viewport_width;
    let gone: Vec<Handle> = world
        .projectiles()
        .iter()
        .filter(|(_, p)| p.x + PROJECTILE_WIDTH < left || p.x > right)
        .map(|(h, _)| h)
        .collect();
    for h in gone {
        world.remove_projectile(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrunner_core::entity::EnemyKind;
    use skyrunner_core::generation::EnemySpec;
    use skyrunner_core::test_helpers::flat_chunk_spec;

    fn world_with_enemy_at(x: u32, y: u32) -> (World, SimConfig) {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.enemies.push(EnemySpec {
            x,
            y,
            kind: EnemyKind::Slime,
        });
        world.append_chunk(0, &spec, &cfg);
        (world, cfg)
    }

    #[test]
    fn spawn_at_player_center_signed_by_facing() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut player = PlayerState::grounded_spawn(Vec2::new(100.0, 200.0));

        let h = spawn(&mut world, &player, &cfg);
        let p = world.projectiles().get(h).unwrap().clone();
        assert_eq!(p.velocity.x, cfg.projectile_speed);
        assert_eq!(
            p.x,
            100.0 + cfg.player_width / 2.0 - PROJECTILE_WIDTH / 2.0
        );

        player.facing = Facing::Left;
        let h = spawn(&mut world, &player, &cfg);
        assert_eq!(
            world.projectiles().get(h).unwrap().velocity.x,
            -cfg.projectile_speed
        );
    }

    #[test]
    fn advance_scales_with_dt() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let player = PlayerState::grounded_spawn(Vec2::new(100.0, 200.0));
        let h = spawn(&mut world, &player, &cfg);
        let x0 = world.projectiles().get(h).unwrap().x;

        advance(&mut world, 2.0);
        assert_eq!(
            world.projectiles().get(h).unwrap().x,
            x0 + cfg.projectile_speed * 2.0
        );
    }

    #[test]
    fn hit_marks_both_and_scores_bounty() {
        let (mut world, cfg) = world_with_enemy_at(4, 10);
        let enemy_x = 4.0 * cfg.tile_size;
        let enemy_y = 10.0 * cfg.tile_size;
        world.spawn_projectile(enemy_x + 5.0, enemy_y + 5.0, Vec2::new(10.0, 0.0));

        let outcome = collide(&world, &cfg);
        assert_eq!(outcome.spent_projectiles.len(), 1);
        assert_eq!(outcome.killed_enemies.len(), 1);
        assert_eq!(outcome.points, KILL_POINTS);
    }

    #[test]
    fn two_projectiles_one_enemy_single_bounty() {
        let (mut world, cfg) = world_with_enemy_at(4, 10);
        let enemy_x = 4.0 * cfg.tile_size;
        let enemy_y = 10.0 * cfg.tile_size;
        world.spawn_projectile(enemy_x + 2.0, enemy_y + 5.0, Vec2::new(10.0, 0.0));
        world.spawn_projectile(enemy_x + 20.0, enemy_y + 5.0, Vec2::new(10.0, 0.0));

        let outcome = collide(&world, &cfg);
        assert_eq!(outcome.spent_projectiles.len(), 2, "both projectiles spent");
        assert_eq!(outcome.killed_enemies.len(), 1);
        assert_eq!(outcome.points, KILL_POINTS, "one kill, one bounty");
    }

    #[test]
    fn one_projectile_two_enemies_both_killed() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let mut spec = flat_chunk_spec();
        spec.enemies.push(EnemySpec {
            x: 4,
            y: 10,
            kind: EnemyKind::Slime,
        });
        spec.enemies.push(EnemySpec {
            x: 4,
            y: 10,
            kind: EnemyKind::Ladybug,
        });
        world.append_chunk(0, &spec, &cfg);
        world.spawn_projectile(
            4.0 * cfg.tile_size + 2.0,
            10.0 * cfg.tile_size + 5.0,
            Vec2::new(10.0, 0.0),
        );

        let outcome = collide(&world, &cfg);
        assert_eq!(outcome.killed_enemies.len(), 2);
        assert_eq!(outcome.points, 2 * KILL_POINTS);
    }

    #[test]
    fn miss_leaves_everything_alive() {
        let (mut world, cfg) = world_with_enemy_at(4, 10);
        world.spawn_projectile(20.0 * cfg.tile_size, 2.0 * cfg.tile_size, Vec2::new(10.0, 0.0));

        let outcome = collide(&world, &cfg);
        assert!(outcome.spent_projectiles.is_empty());
        assert!(outcome.killed_enemies.is_empty());
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn offscreen_projectiles_pruned_on_both_sides() {
        let cfg = SimConfig::default();
        let mut world = World::new(&cfg);
        let camera_x = 1000.0;
        let on_screen =
            world.spawn_projectile(camera_x + 200.0, 300.0, Vec2::new(10.0, 0.0));
        let off_left =
            world.spawn_projectile(camera_x - 100.0, 300.0, Vec2::new(-10.0, 0.0));
        let off_right = world.spawn_projectile(
            camera_x + cfg.viewport_width + 1.0,
            300.0,
            Vec2::new(10.0, 0.0),
        );

        cull_offscreen(&mut world, camera_x, &cfg);

        assert!(world.projectiles().contains(on_screen));
        assert!(!world.projectiles().contains(off_left));
        assert!(!world.projectiles().contains(off_right));
    }
}
