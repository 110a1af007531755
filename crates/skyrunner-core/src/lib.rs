pub mod entity;
pub mod events;
pub mod generation;
pub mod input;
pub mod math;
pub mod phase;
pub mod slot;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tokio::sync::oneshot;

    use crate::entity::TileKind;
    use crate::generation::{
        CHUNK_WIDTH_TILES, ChunkGenerator, ChunkSpec, GenerationResult, PlatformSpec, SpotSpec,
    };
    use crate::input::InputSnapshot;

    pub fn no_input() -> InputSnapshot {
        InputSnapshot::default()
    }

    pub fn hold_right() -> InputSnapshot {
        InputSnapshot {
            right: true,
            ..Default::default()
        }
    }

    pub fn hold_left() -> InputSnapshot {
        InputSnapshot {
            left: true,
            ..Default::default()
        }
    }

    pub fn press_jump() -> InputSnapshot {
        InputSnapshot {
            jump: true,
            ..Default::default()
        }
    }

    pub fn press_attack() -> InputSnapshot {
        InputSnapshot {
            attack: true,
            ..Default::default()
        }
    }

    /// One full-width grass platform at row 13 — a flat, always-traversable
    /// chunk with nothing else in it.
    pub fn flat_chunk_spec() -> ChunkSpec {
        ChunkSpec {
            platforms: vec![PlatformSpec {
                x: 0,
                y: 13,
                width: CHUNK_WIDTH_TILES,
                tile: TileKind::Grass,
            }],
            ..Default::default()
        }
    }

    /// Flat chunk plus one coin, for collection tests.
    pub fn flat_chunk_spec_with_coin(coin_x: u32, coin_y: u32) -> ChunkSpec {
        let mut spec = flat_chunk_spec();
        spec.coins.push(SpotSpec {
            x: coin_x,
            y: coin_y,
        });
        spec
    }

    /// Always succeeds with `count` flat chunks.
    pub struct FlatGenerator;

    impl ChunkGenerator for FlatGenerator {
        fn generate(&self, _start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult> {
            futures::future::ready(GenerationResult {
                success: true,
                chunks: vec![flat_chunk_spec(); count],
            })
            .boxed()
        }
    }

    /// Always succeeds, replicating a fixed spec `count` times.
    pub struct CannedGenerator {
        pub spec: ChunkSpec,
    }

    impl ChunkGenerator for CannedGenerator {
        fn generate(&self, _start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult> {
            futures::future::ready(GenerationResult {
                success: true,
                chunks: vec![self.spec.clone(); count],
            })
            .boxed()
        }
    }

    /// Reports failure but honors the exactly-`count`-chunks contract with
    /// its own flat fallback, like a service that lost its upstream.
    pub struct FailingGenerator;

    impl ChunkGenerator for FailingGenerator {
        fn generate(&self, _start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult> {
            futures::future::ready(GenerationResult {
                success: false,
                chunks: vec![flat_chunk_spec(); count],
            })
            .boxed()
        }
    }

    /// Claims success but returns no chunks — a contract violation the
    /// streaming manager must treat as failure.
    pub struct MalformedGenerator;

    impl ChunkGenerator for MalformedGenerator {
        fn generate(
            &self,
            _start_tile: i64,
            _count: usize,
        ) -> BoxFuture<'static, GenerationResult> {
            futures::future::ready(GenerationResult {
                success: true,
                chunks: Vec::new(),
            })
            .boxed()
        }
    }

    /// Never completes; keeps one request permanently in flight.
    pub struct PendingGenerator;

    impl ChunkGenerator for PendingGenerator {
        fn generate(
            &self,
            _start_tile: i64,
            _count: usize,
        ) -> BoxFuture<'static, GenerationResult> {
            futures::future::pending().boxed()
        }
    }

    /// Wraps another generator and counts how many requests reach it.
    pub struct CountingGenerator<G> {
        inner: G,
        calls: AtomicUsize,
    }

    impl<G> CountingGenerator<G> {
        pub fn new(inner: G) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl<G: ChunkGenerator> ChunkGenerator for CountingGenerator<G> {
        fn generate(&self, start_tile: i64, count: usize) -> BoxFuture<'static, GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate(start_tile, count)
        }
    }

    /// Completes each request only when the test releases its gate, in FIFO
    /// order. Lets tests interleave restarts with in-flight responses.
    pub struct GateGenerator {
        gates: Mutex<VecDeque<oneshot::Receiver<GenerationResult>>>,
    }

    impl Default for GateGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl GateGenerator {
        pub fn new() -> Self {
            Self {
                gates: Mutex::new(VecDeque::new()),
            }
        }

        /// Queue a gate for the next request; send on the returned channel
        /// to release it.
        pub fn add_gate(&self) -> oneshot::Sender<GenerationResult> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().expect("gate lock").push_back(rx);
            tx
        }
    }

    impl ChunkGenerator for GateGenerator {
        fn generate(
            &self,
            _start_tile: i64,
            _count: usize,
        ) -> BoxFuture<'static, GenerationResult> {
            let gate = self.gates.lock().expect("gate lock").pop_front();
            async move {
                match gate {
                    Some(rx) => rx.await.unwrap_or(GenerationResult {
                        success: false,
                        chunks: Vec::new(),
                    }),
                    None => futures::future::pending().await,
                }
            }
            .boxed()
        }
    }

    /// Yield to the runtime so spawned generation tasks can run.
    pub async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }
}
