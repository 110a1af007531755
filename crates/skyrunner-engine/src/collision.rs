use skyrunner_core::entity::Platform;
use skyrunner_core::math::Vec2;

use crate::config::SimConfig;
use crate::player::{Animation, PlayerState};

/// Result of reconciling a proposed displacement against nearby platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOutcome {
    /// The resolved position fell past the world floor; the run is over.
    pub fell_out: bool,
}

/// Two-phase AABB resolution: vertical first, then horizontal with the
/// vertically-resolved Y, to avoid order-dependent tunneling.
///
/// Platforms are evaluated in storage order and each overlapping platform's
/// correction replaces the prior one; the last overlapping platform in
/// iteration order determines the final correction.
pub fn resolve(
    state: &mut PlayerState,
    proposed: Vec2,
    platforms: &[&Platform],
    cfg: &SimConfig,
) -> ResolveOutcome {
    let pw = cfg.player_width;
    let ph = cfg.player_height;
    let tile = cfg.tile_size;
    let prev = state.position;

    let mut x = proposed.x;
    let mut y = proposed.y;

    // Vertical pass. Horizontal extent is taken at the proposed X; the
    // crossing test tracks the evolving Y so later platforms replace
    // earlier snaps.
    for p in platforms {
        let horizontal_overlap = x + pw > p.x && x < p.x + p.width;
        if !horizontal_overlap {
            continue;
        }
        if state.velocity.y >= 0.0 && prev.y + ph <= p.y && y + ph >= p.y {
            // Landing: bottom edge crossed the platform top while descending.
            y = p.y - ph;
            state.velocity.y = 0.0;
            state.is_grounded = true;
            state.is_jumping = false;
            state.has_double_jumped = false;
            if state.animation == Animation::Jump {
                state.animation = Animation::Idle;
            }
        } else if state.velocity.y < 0.0 && prev.y >= p.y + tile && y <= p.y + tile {
            // Head bump: top edge crossed the platform bottom while rising.
            y = p.y + tile;
            state.velocity.y = 0.0;
        }
    }

    // Horizontal pass, against the vertically-resolved Y. The clamp
    // direction is the tick's travel direction, captured up front so every
    // overlapping platform applies the same replacement rule.
    let moving_right = state.velocity.x > 0.0;
    let moving_left = state.velocity.x < 0.0;
    for p in platforms {
        let overlap =
            x + pw > p.x && x < p.x + p.width && y + ph > p.y && y < p.y + tile;
        if !overlap {
            continue;
        }
        if moving_right {
            x = p.x - pw;
        } else if moving_left {
            x = p.x + p.width;
        }
        state.velocity.x = 0.0;
    }

    state.position = Vec2::new(x, y);

    ResolveOutcome {
        fell_out: y > cfg.fall_limit(),
    }
}
