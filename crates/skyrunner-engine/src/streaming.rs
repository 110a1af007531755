use std::sync::Arc;

use tokio::sync::mpsc;

use skyrunner_core::entity::TileKind;
use skyrunner_core::generation::{
    CHUNK_WIDTH_TILES, ChunkGenerator, ChunkSpec, GenerationResult, PlatformSpec,
};

use crate::config::SimConfig;
use crate::world::World;

/// Ground row for synthesized fallback terrain (top of platform at
/// 13 × tile size, matching the offline generator's ground level).
const FALLBACK_GROUND_ROW: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Idle,
    Requesting { epoch: u64 },
}

struct TaggedResult {
    epoch: u64,
    start_tile: i64,
    count: usize,
    result: GenerationResult,
}

/// Report of one merged generation response.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub chunks: usize,
    pub fallback: bool,
    pub warning: Option<String>,
}

/// Decides when to request more world, tracks the single in-flight request,
/// and merges results (or deterministic fallback) into the entity store as
/// an atomic batch at a tick boundary.
///
/// Requests are tagged with the run's epoch; responses from a previous run
/// (a restart happened while the request was in flight) are discarded.
pub struct StreamingManager {
    generator: Arc<dyn ChunkGenerator>,
    state: RequestState,
    epoch: u64,
    next_start_tile: i64,
    results_tx: mpsc::UnboundedSender<TaggedResult>,
    results_rx: mpsc::UnboundedReceiver<TaggedResult>,
}

impl StreamingManager {
    pub fn new(generator: Arc<dyn ChunkGenerator>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            generator,
            state: RequestState::Idle,
            epoch: 0,
            next_start_tile: 0,
            results_tx,
            results_rx,
        }
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.state, RequestState::Requesting { .. })
    }

    /// Start a fresh run: bump the epoch (orphaning any in-flight request)
    /// and issue the initial load.
    ///
    /// Must be called from within a tokio runtime; generation runs as a
    /// spawned task.
    pub fn begin_run(&mut self, initial_chunks: usize) {
        self.epoch += 1;
        self.state = RequestState::Idle;
        self.next_start_tile = 0;
        self.issue(initial_chunks);
    }

    fn issue(&mut self, count: usize) {
        let epoch = self.epoch;
        let start_tile = self.next_start_tile;
        let future = self.generator.generate(start_tile, count);
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = future.await;
            let _ = tx.send(TaggedResult {
                epoch,
                start_tile,
                count,
                result,
            });
        });
        self.state = RequestState::Requesting { epoch };
    }

    /// Merge a completed response into the world, if one has arrived.
    /// Stale-epoch responses are dropped without touching the world.
    pub fn poll_merge(&mut self, world: &mut World, cfg: &SimConfig) -> Option<MergeReport> {
        loop {
            let tagged = self.results_rx.try_recv().ok()?;
            if tagged.epoch != self.epoch {
                tracing::debug!(
                    epoch = tagged.epoch,
                    current = self.epoch,
                    "discarding stale generation response"
                );
                continue;
            }
            return Some(self.merge(tagged, world, cfg));
        }
    }

    fn merge(&mut self, tagged: TaggedResult, world: &mut World, cfg: &SimConfig) -> MergeReport {
        let TaggedResult {
            start_tile,
            count,
            result,
            ..
        } = tagged;
        let width = i64::from(CHUNK_WIDTH_TILES);

        let usable =
            result.chunks.len() == count && result.chunks.iter().all(ChunkSpec::is_consistent);

        let report = if usable {
            for (i, spec) in result.chunks.iter().enumerate() {
                world.append_chunk(start_tile + i as i64 * width, spec, cfg);
            }
            MergeReport {
                chunks: count,
                fallback: !result.success,
                warning: (!result.success).then(|| generator_failure_warning(start_tile)),
            }
        } else {
            tracing::warn!(
                start_tile,
                count,
                returned = result.chunks.len(),
                "unusable generation response, synthesizing fallback chunks"
            );
            let spec = fallback_chunk_spec();
            for i in 0..count {
                world.append_chunk(start_tile + i as i64 * width, &spec, cfg);
            }
            MergeReport {
                chunks: count,
                fallback: true,
                warning: Some(
                    "Level generator returned an unusable response. Using fallback terrain."
                        .to_string(),
                ),
            }
        };

        self.next_start_tile = start_tile + count as i64 * width;
        self.state = RequestState::Idle;
        report
    }

    /// Issue a growth request once the player closes in on the loaded
    /// world's right edge. A trigger while a request is in flight is a no-op.
    pub fn maybe_request(&mut self, player_x: f64, world: &World, cfg: &SimConfig) {
        if self.is_requesting() {
            return;
        }
        let Some(last_end) = world.last_chunk_end() else {
            return;
        };
        if player_x >= last_end - cfg.lookahead_viewports * cfg.viewport_width {
            self.issue(cfg.stream_chunks);
        }
    }
}

fn generator_failure_warning(start_tile: i64) -> String {
    if start_tile == 0 {
        "Failed to reach the level generator. Playing with offline fallback levels.".to_string()
    } else {
        "Lost connection to the level generator. Streaming fallback terrain.".to_string()
    }
}

/// A flat, always-traversable chunk: one full-width grass platform.
pub fn fallback_chunk_spec() -> ChunkSpec {
    ChunkSpec {
        platforms: vec![PlatformSpec {
            x: 0,
            y: FALLBACK_GROUND_ROW,
            width: CHUNK_WIDTH_TILES,
            tile: TileKind::Grass,
        }],
        ..Default::default()
    }
}
