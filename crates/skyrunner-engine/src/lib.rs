pub mod collision;
pub mod config;
pub mod enemy;
pub mod interact;
pub mod level_gen;
pub mod player;
pub mod projectile;
pub mod snapshot;
pub mod streaming;
pub mod world;

use std::collections::HashSet;
use std::sync::Arc;

use skyrunner_core::events::SimEvent;
use skyrunner_core::generation::ChunkGenerator;
use skyrunner_core::input::{EdgeTracker, InputSnapshot};
use skyrunner_core::math::Vec2;
use skyrunner_core::phase::{PhaseError, RunPhase};

pub use config::SimConfig;
pub use level_gen::OfflineGenerator;
pub use player::{Animation, Facing, PlayerState};
pub use snapshot::RenderSnapshot;

/// Per-run bookkeeping: score, lifecycle phase, and the sticky
/// user-visible generation warning.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub score: u64,
    pub phase: RunPhase,
    pub pending_warning: Option<String>,
}

impl RunState {
    fn new() -> Self {
        Self {
            score: 0,
            phase: RunPhase::MainMenu,
            pending_warning: None,
        }
    }
}

/// The per-tick orchestrator. The host invokes [`Engine::tick`] once per
/// frame callback; each tick runs controller → collision → interaction →
/// enemies → projectiles → streaming, synchronously and in that order.
///
/// The engine must live inside a tokio runtime: chunk generation runs as
/// spawned tasks and is merged back at tick boundaries.
pub struct Engine {
    config: SimConfig,
    world: world::World,
    player: PlayerState,
    run: RunState,
    streaming: streaming::StreamingManager,
    edges: EdgeTracker,
    /// Accumulated simulated seconds; drives hover motion.
    sim_time: f64,
}

impl Engine {
    pub fn new(generator: Arc<dyn ChunkGenerator>) -> Self {
        Self::with_config(generator, SimConfig::default())
    }

    pub fn with_config(generator: Arc<dyn ChunkGenerator>, config: SimConfig) -> Self {
        let world = world::World::new(&config);
        let player = PlayerState::airborne_spawn(Vec2::new(config.tile_size * 2.0, 0.0));
        Self {
            config,
            world,
            player,
            run: RunState::new(),
            streaming: streaming::StreamingManager::new(generator),
            edges: EdgeTracker::default(),
            sim_time: 0.0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn pending_warning(&self) -> Option<&str> {
        self.run.pending_warning.as_deref()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn world(&self) -> &world::World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Camera follows the player with a fixed lead.
    pub fn camera_x(&self) -> f64 {
        self.player.position.x - self.config.viewport_width / config::CAMERA_LEAD_DIVISOR
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        snapshot::build(
            &self.world,
            &self.player,
            self.run.score,
            self.camera_x(),
            self.run.pending_warning.clone(),
            &self.config,
        )
    }

    /// Start (or restart) a run: reset score, player, and world, then issue
    /// the initial chunk request. The phase stays `Loading` until that
    /// request completes; a restart while already loading is rejected.
    pub fn start(&mut self) -> Result<(), PhaseError> {
        self.run.phase = self.run.phase.begin_loading()?;
        self.run.score = 0;
        self.run.pending_warning = None;
        self.world.reset();
        self.edges.reset();
        self.sim_time = 0.0;
        self.player = PlayerState::airborne_spawn(Vec2::new(self.config.tile_size * 2.0, 0.0));
        self.streaming.begin_run(self.config.initial_chunks);
        Ok(())
    }

    /// Advance the simulation by one host frame. `elapsed_ms` is the time
    /// since the previous callback; degenerate values make the tick a
    /// complete no-op. Returns the simulation events raised this step.
    pub fn tick(&mut self, elapsed_ms: f64, input: &InputSnapshot) -> Vec<SimEvent> {
        match self.run.phase {
            RunPhase::MainMenu | RunPhase::GameOver => Vec::new(),
            RunPhase::Loading => self.tick_loading(),
            RunPhase::Playing => self.tick_playing(elapsed_ms, input),
        }
    }

    /// While loading, only poll for the initial world; physics stays frozen.
    fn tick_loading(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if let Some(report) = self.streaming.poll_merge(&mut self.world, &self.config) {
            events.push(SimEvent::WorldExtended {
                chunks: report.chunks,
                fallback: report.fallback,
            });
            if let Some(warning) = report.warning {
                self.run.pending_warning = Some(warning.clone());
                events.push(SimEvent::GenerationFallback { warning });
            }
            self.place_player_at_spawn();
            self.run.phase = self
                .run
                .phase
                .begin_playing()
                .expect("Loading precedes Playing");
        }
        events
    }

    fn tick_playing(&mut self, elapsed_ms: f64, input: &InputSnapshot) -> Vec<SimEvent> {
        let dt = elapsed_ms / config::NOMINAL_FRAME_MS;
        if !dt.is_finite() || dt <= 0.0 || dt > config::MAX_DT {
            return Vec::new();
        }
        self.sim_time += elapsed_ms / 1000.0;

        let mut events = Vec::new();
        let edges = self.edges.rising(input);

        // Player controller: proposed displacement from input + gravity.
        let proposed = player::integrate(&mut self.player, input, edges.jump, dt, &self.config);

        // Collision resolution against nearby platforms.
        let min_x = proposed.x.min(self.player.position.x) - self.config.tile_size;
        let max_x = proposed.x.max(self.player.position.x)
            + self.config.player_width
            + self.config.tile_size;
        let platforms = self.world.platforms_near(min_x, max_x);
        let resolved = collision::resolve(&mut self.player, proposed, &platforms, &self.config);
        if resolved.fell_out {
            return self.game_over(events);
        }

        // Interaction & scoring: discover all overlaps, then apply the
        // removals and the score delta as one batch.
        let player_rect = self.player.rect(&self.config);
        let hits = interact::scan(&self.world, &player_rect, &self.config);
        if !hits.collected.is_empty() {
            let ids: HashSet<_> = hits.collected.iter().copied().collect();
            self.world.remove_collectibles(&ids);
            self.run.score += hits.points;
            events.push(SimEvent::ScoreChanged {
                score: self.run.score,
                delta: hits.points,
            });
        }
        if hits.lethal {
            return self.game_over(events);
        }

        // Enemy behavior.
        enemy::update(self.world.enemies_mut(), dt, self.sim_time);

        // Projectiles: spawn on attack edge, advance, resolve hits in one
        // batch, then prune whatever left the viewport.
        if edges.attack {
            projectile::spawn(&mut self.world, &self.player, &self.config);
        }
        projectile::advance(&mut self.world, dt);
        let combat = projectile::collide(&self.world, &self.config);
        for handle in &combat.spent_projectiles {
            self.world.remove_projectile(*handle);
        }
        for handle in &combat.killed_enemies {
            if let Some(enemy) = self.world.kill_enemy(*handle) {
                events.push(SimEvent::EnemyDefeated { id: enemy.id });
            }
        }
        if combat.points > 0 {
            self.run.score += combat.points;
            events.push(SimEvent::ScoreChanged {
                score: self.run.score,
                delta: combat.points,
            });
        }
        let camera_x = self.camera_x();
        projectile::cull_offscreen(&mut self.world, camera_x, &self.config);

        // Streaming: merge any completed request first, then decide whether
        // to ask for more world.
        if let Some(report) = self.streaming.poll_merge(&mut self.world, &self.config) {
            events.push(SimEvent::WorldExtended {
                chunks: report.chunks,
                fallback: report.fallback,
            });
            if let Some(warning) = report.warning {
                self.run.pending_warning = Some(warning.clone());
                events.push(SimEvent::GenerationFallback { warning });
            }
        }
        self.streaming
            .maybe_request(self.player.position.x, &self.world, &self.config);

        events
    }

    fn game_over(&mut self, mut events: Vec<SimEvent>) -> Vec<SimEvent> {
        self.run.phase = self
            .run
            .phase
            .end_run()
            .expect("only a Playing tick can end the run");
        events.push(SimEvent::GameOver {
            score: self.run.score,
        });
        events
    }

    /// Place the player on the first platform of the first chunk, falling
    /// back to a fixed height when the chunk is bare.
    fn place_player_at_spawn(&mut self) {
        let spawn_x = self.config.tile_size * 2.0;
        let first_platform = self
            .world
            .chunks()
            .first()
            .and_then(|c| c.platforms.first());
        self.player = match first_platform {
            Some(p) => PlayerState::grounded_spawn(Vec2::new(
                spawn_x,
                p.y - self.config.player_height,
            )),
            None => {
                PlayerState::airborne_spawn(Vec2::new(spawn_x, self.config.tile_size * 10.0))
            },
        };
    }
}
