use serde::{Deserialize, Serialize};

/// Downward gravity acceleration (px per nominal frame, per frame).
pub const GRAVITY: f64 = 0.5;
/// Horizontal move speed (px per nominal frame).
pub const MOVE_SPEED: f64 = 5.0;
/// Initial upward jump velocity magnitude.
pub const JUMP_FORCE: f64 = 12.0;
/// Double jump multiplier applied to `JUMP_FORCE`.
pub const DOUBLE_JUMP_FACTOR: f64 = 1.5;
/// Tile size in world pixels.
pub const TILE_SIZE: f64 = 48.0;
/// Player AABB width.
pub const PLAYER_WIDTH: f64 = TILE_SIZE * 0.8;
/// Player AABB height.
pub const PLAYER_HEIGHT: f64 = TILE_SIZE * 0.95;
/// Nominal frame duration; `dt = elapsed_ms / NOMINAL_FRAME_MS`.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
/// Ticks with `dt` above this are dropped as degenerate (tab-suspend stalls).
pub const MAX_DT: f64 = 5.0;
/// Falling below this many tile heights ends the run.
pub const FALL_LIMIT_TILES: f64 = 20.0;
/// Projectile travel speed (px per nominal frame).
pub const PROJECTILE_SPEED: f64 = 10.0;
/// Projectile AABB.
pub const PROJECTILE_WIDTH: f64 = TILE_SIZE * 0.5;
pub const PROJECTILE_HEIGHT: f64 = TILE_SIZE * 0.2;
/// Patrol enemies walk at half the player's nominal speed.
pub const PATROL_SPEED: f64 = MOVE_SPEED * 0.5;
/// Patrol range either side of the spawn origin.
pub const PATROL_RANGE: f64 = TILE_SIZE * 2.0;
/// Hover amplitude for airborne enemies.
pub const HOVER_AMPLITUDE: f64 = TILE_SIZE * 0.5;
/// Hover angular frequency in radians per simulated second.
pub const HOVER_ANGULAR_FREQ: f64 = 2.0;
/// Camera leads the player by `viewport_width / CAMERA_LEAD_DIVISOR`.
pub const CAMERA_LEAD_DIVISOR: f64 = 2.5;

/// Point values.
pub const COIN_POINTS: u64 = 10;
pub const GEM_POINTS: u64 = 50;
pub const KILL_POINTS: u64 = 25;

/// Tunable simulation parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: f64,
    pub move_speed: f64,
    pub jump_force: f64,
    pub tile_size: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub projectile_speed: f64,
    /// Chunks requested by the initial load.
    pub initial_chunks: usize,
    /// Chunks requested per streamed growth step.
    pub stream_chunks: usize,
    /// Trigger streaming when the player is within this many viewport widths
    /// of the loaded world's right edge.
    pub lookahead_viewports: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_force: JUMP_FORCE,
            tile_size: TILE_SIZE,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            projectile_speed: PROJECTILE_SPEED,
            initial_chunks: 3,
            stream_chunks: 2,
            lookahead_viewports: 1.5,
        }
    }
}

impl SimConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYRUNNER_CONFIG")
            .unwrap_or_else(|_| "config/skyrunner.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SimConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SimConfig::default()
                },
            },
            Err(_) => SimConfig::default(),
        }
    }

    /// Chunk width in world pixels.
    pub fn chunk_width_px(&self) -> f64 {
        f64::from(skyrunner_core::generation::CHUNK_WIDTH_TILES) * self.tile_size
    }

    /// World-pixel y below which the player is lost.
    pub fn fall_limit(&self) -> f64 {
        self.tile_size * FALL_LIMIT_TILES
    }
}
