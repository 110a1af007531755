use skyrunner_core::entity::Enemy;
use skyrunner_core::slot::SlotArena;

use crate::config::{HOVER_AMPLITUDE, HOVER_ANGULAR_FREQ, PATROL_RANGE};

/// Advance every enemy one tick, in place.
///
/// Patrol kinds oscillate horizontally around their spawn origin, reversing
/// once displacement exceeds the patrol range. Hover kinds ride a sinusoid
/// on accumulated simulation time, never wall-clock, so motion is
/// deterministic and freezes while the simulation is paused.
pub fn update(enemies: &mut SlotArena<Enemy>, dt: f64, sim_time: f64) {
    for (_, enemy) in enemies.iter_mut() {
        if enemy.kind.hovers() {
            enemy.y =
                enemy.spawn_origin.y + HOVER_AMPLITUDE * (sim_time * HOVER_ANGULAR_FREQ).sin();
        } else {
            enemy.x += enemy.velocity.x * dt;
            let offset = enemy.x - enemy.spawn_origin.x;
            if offset > PATROL_RANGE {
                enemy.x = enemy.spawn_origin.x + PATROL_RANGE;
                enemy.velocity.x = -enemy.velocity.x.abs();
            } else if offset < -PATROL_RANGE {
                enemy.x = enemy.spawn_origin.x - PATROL_RANGE;
                enemy.velocity.x = enemy.velocity.x.abs();
            }
        }
    }
}
