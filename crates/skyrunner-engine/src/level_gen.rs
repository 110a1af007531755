use futures::FutureExt;
use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyrunner_core::entity::{EnemyKind, TileKind};
use skyrunner_core::generation::{
    CHUNK_WIDTH_TILES, ChunkGenerator, ChunkSpec, EnemySpec, GenerationResult, PlatformSpec,
    SpotSpec,
};

/// Ground platform row; its top sits at 13 × tile size.
const GROUND_ROW: u32 = 13;

/// Deterministic seeded level generator. The shipped default and test
/// vehicle; the remote generative service implements the same trait as an
/// external collaborator.
pub struct OfflineGenerator {
    seed: u64,
}

impl OfflineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for OfflineGenerator {
    fn default() -> Self {
        Self::new(42)
    }
}

impl ChunkGenerator for OfflineGenerator {
    fn generate(&self, start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult> {
        let width = i64::from(CHUNK_WIDTH_TILES);
        let chunks = (0..count)
            .map(|i| {
                let chunk_index = start_tile.div_euclid(width) + i as i64;
                build_chunk(self.seed, chunk_index)
            })
            .collect();
        futures::future::ready(GenerationResult {
            success: true,
            chunks,
        })
        .boxed()
    }
}

/// Build one chunk, seeded by chunk position so regeneration of the same
/// offset always yields the same terrain.
fn build_chunk(seed: u64, chunk_index: i64) -> ChunkSpec {
    let mut rng = StdRng::seed_from_u64(
        seed ^ (chunk_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
    );
    let mut spec = ChunkSpec::default();

    // The first chunk is a safe spawn area: flat ground, nothing hostile.
    if chunk_index == 0 {
        ground(&mut spec, 0, CHUNK_WIDTH_TILES, TileKind::Grass);
        coin_row(&mut spec, 8, 3, GROUND_ROW - 3);
        return spec;
    }

    let surface = surface_kind(&mut rng);
    let pattern = rng.random_range(0u8..5);

    match pattern {
        0 => {
            // Ground split by a pit.
            let pit_start = rng.random_range(6u32..14);
            let pit_width = rng.random_range(2u32..4);
            ground(&mut spec, 0, pit_start, surface);
            ground(
                &mut spec,
                pit_start + pit_width,
                CHUNK_WIDTH_TILES - pit_start - pit_width,
                surface,
            );
            // Reward for clearing the gap.
            coin_row(&mut spec, pit_start, pit_width, GROUND_ROW - 4);
        },
        1 => {
            // Raised platforms with coins on top and a patroller below.
            ground(&mut spec, 0, CHUNK_WIDTH_TILES, surface);
            let plat_y = rng.random_range(8u32..11);
            let plat_x = rng.random_range(3u32..12);
            let plat_len = rng.random_range(3u32..7);
            spec.platforms.push(PlatformSpec {
                x: plat_x,
                y: plat_y,
                width: plat_len,
                tile: surface,
            });
            coin_row(&mut spec, plat_x, plat_len, plat_y - 2);
            spec.enemies.push(EnemySpec {
                x: plat_x + plat_len / 2,
                y: GROUND_ROW - 1,
                kind: ground_enemy(&mut rng),
            });
        },
        2 => {
            // Rising steps toward a gem.
            ground(&mut spec, 0, CHUNK_WIDTH_TILES, surface);
            let mut y = GROUND_ROW - 2;
            let mut x = rng.random_range(2u32..5);
            for _ in 0..3 {
                spec.platforms.push(PlatformSpec {
                    x,
                    y,
                    width: 3,
                    tile: surface,
                });
                x += 4;
                y = y.saturating_sub(2);
            }
            spec.gems.push(SpotSpec { x: x - 3, y: y + 1 });
        },
        3 => {
            // Spike run with a safe platform above.
            ground(&mut spec, 0, CHUNK_WIDTH_TILES, surface);
            let spike_start = rng.random_range(6u32..12);
            let spike_len = rng.random_range(2u32..4);
            for i in 0..spike_len {
                spec.spikes.push(SpotSpec {
                    x: spike_start + i,
                    y: GROUND_ROW - 1,
                });
            }
            spec.platforms.push(PlatformSpec {
                x: spike_start.saturating_sub(1),
                y: GROUND_ROW - 4,
                width: spike_len + 2,
                tile: surface,
            });
        },
        _ => {
            // Enemy gauntlet: a patroller on the ground, a fly overhead.
            ground(&mut spec, 0, CHUNK_WIDTH_TILES, surface);
            spec.enemies.push(EnemySpec {
                x: rng.random_range(5u32..20),
                y: GROUND_ROW - 1,
                kind: ground_enemy(&mut rng),
            });
            spec.enemies.push(EnemySpec {
                x: rng.random_range(5u32..20),
                y: rng.random_range(6u32..9),
                kind: EnemyKind::Fly,
            });
            coin_row(&mut spec, 10, 4, GROUND_ROW - 3);
        },
    }

    spec
}

fn ground(spec: &mut ChunkSpec, x: u32, width: u32, tile: TileKind) {
    if width == 0 || x >= CHUNK_WIDTH_TILES {
        return;
    }
    spec.platforms.push(PlatformSpec {
        x,
        y: GROUND_ROW,
        width: width.min(CHUNK_WIDTH_TILES - x),
        tile,
    });
}

fn coin_row(spec: &mut ChunkSpec, x: u32, len: u32, y: u32) {
    for i in 0..len {
        let cx = x + i;
        if cx < CHUNK_WIDTH_TILES {
            spec.coins.push(SpotSpec { x: cx, y });
        }
    }
}

fn surface_kind(rng: &mut StdRng) -> TileKind {
    match rng.random_range(0u8..6) {
        0 => TileKind::Grass,
        1 => TileKind::Dirt,
        2 => TileKind::Stone,
        3 => TileKind::Snow,
        4 => TileKind::Sand,
        _ => TileKind::Castle,
    }
}

fn ground_enemy(rng: &mut StdRng) -> EnemyKind {
    if rng.random_range(0u8..2) == 0 {
        EnemyKind::Slime
    } else {
        EnemyKind::Ladybug
    }
}
