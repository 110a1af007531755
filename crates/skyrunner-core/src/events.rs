use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Events raised by the simulation during a tick, in the order they occurred.
/// The host consumes these for HUD updates, sound cues, and overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Score changed by `delta` (coin/gem pickups and enemy kills are each
    /// applied as one batched increment).
    ScoreChanged { score: u64, delta: u64 },
    /// An enemy was destroyed by a projectile.
    EnemyDefeated { id: EntityId },
    /// The world grew by `chunks` appended chunks.
    WorldExtended { chunks: usize, fallback: bool },
    /// Generation failed and fallback terrain was substituted.
    GenerationFallback { warning: String },
    /// The run ended; `score` is final.
    GameOver { score: u64 },
}
