use serde::{Deserialize, Serialize};

/// Polled pressed-key snapshot for one tick. The simulation never subscribes
/// to raw key events; the host samples its input device into this each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

/// Rising-edge events derived from consecutive snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeEvents {
    pub jump: bool,
    pub attack: bool,
}

/// Tracks the previous tick's jump/attack levels so held keys fire once.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTracker {
    jump_was_down: bool,
    attack_was_down: bool,
}

impl EdgeTracker {
    /// Consume one snapshot, returning which buttons transitioned
    /// not-pressed → pressed since the last consumed snapshot.
    pub fn rising(&mut self, input: &InputSnapshot) -> EdgeEvents {
        let events = EdgeEvents {
            jump: input.jump && !self.jump_was_down,
            attack: input.attack && !self.attack_was_down,
        };
        self.jump_was_down = input.jump;
        self.attack_was_down = input.attack;
        events
    }

    pub fn reset(&mut self) {
        *self = EdgeTracker::default();
    }
}
