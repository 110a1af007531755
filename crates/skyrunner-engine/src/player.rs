use serde::{Deserialize, Serialize};

use skyrunner_core::input::InputSnapshot;
use skyrunner_core::math::{Rect, Vec2};

use crate::config::{DOUBLE_JUMP_FACTOR, SimConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    Idle,
    Run,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
}

/// The kinematic player body. Mutated exactly once per tick by the
/// controller/resolver pipeline; owned exclusively by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_jumping: bool,
    pub is_grounded: bool,
    pub has_double_jumped: bool,
    pub animation: Animation,
    pub facing: Facing,
}

impl PlayerState {
    /// Spawn standing on a surface.
    pub fn grounded_spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            is_jumping: false,
            is_grounded: true,
            has_double_jumped: false,
            animation: Animation::Idle,
            facing: Facing::Right,
        }
    }

    /// Spawn mid-air, falling onto whatever terrain is below.
    pub fn airborne_spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            is_jumping: true,
            is_grounded: false,
            has_double_jumped: false,
            animation: Animation::Jump,
            facing: Facing::Right,
        }
    }

    pub fn rect(&self, cfg: &SimConfig) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            cfg.player_width,
            cfg.player_height,
        )
    }
}

/// Integrate one tick of input and gravity, returning the proposed position.
///
/// `state.position` is left at the previous tick's value; the collision
/// resolver commits the corrected position. Horizontal velocity is rebuilt
/// from scratch each tick (no acceleration or friction) and both axes are
/// dt-scaled uniformly on displacement.
pub fn integrate(
    state: &mut PlayerState,
    input: &InputSnapshot,
    jump_edge: bool,
    dt: f64,
    cfg: &SimConfig,
) -> Vec2 {
    let was_grounded = state.is_grounded;

    state.animation = Animation::Idle;
    state.velocity.x = 0.0;
    if input.left {
        state.velocity.x = -cfg.move_speed;
        state.animation = Animation::Run;
        state.facing = Facing::Left;
    }
    if input.right {
        // Right wins when both directions are held.
        state.velocity.x = cfg.move_speed;
        state.animation = Animation::Run;
        state.facing = Facing::Right;
    }

    state.velocity.y += cfg.gravity * dt;

    if jump_edge {
        if was_grounded {
            state.velocity.y = -cfg.jump_force;
            state.is_jumping = true;
        } else if state.is_jumping && !state.has_double_jumped {
            state.velocity.y = -cfg.jump_force * DOUBLE_JUMP_FACTOR;
            state.has_double_jumped = true;
        }
    }

    if !was_grounded {
        state.animation = Animation::Jump;
    }

    // Grounding is re-proven by the resolver every tick.
    state.is_grounded = false;

    state.position + state.velocity * dt
}
