//! Background chunk shaping on a fixed worker pool.
//!
//! Shaping touches only the chunk being shaped, so it can run on any thread.
//! Workers receive coordinates over a bounded channel, shape a fresh chunk and
//! send it back. Population stays with the caller because it writes through
//! the shared chunk store.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, bounded};
use skyland_voxel::{Chunk, ChunkCoord};

use crate::error::GeneratorError;
use crate::generator::SkyGenerator;

/// A shaping result ready for insertion into the world.
#[derive(Debug)]
pub struct ShapedChunk {
    pub coord: ChunkCoord,
    /// The shaped chunk, or why shaping failed.
    pub result: Result<Chunk, GeneratorError>,
    /// Shaping time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Shapes chunks across a thread pool.
pub struct ShapingPool {
    task_sender: Option<Sender<ChunkCoord>>,
    result_receiver: Option<Receiver<ShapedChunk>>,
    /// Submitted but not yet handed back to the caller.
    in_flight: AtomicU64,
    workers: Vec<JoinHandle<()>>,
}

impl ShapingPool {
    /// Create a pool.
    ///
    /// # Arguments
    /// - `generator`: Shared generator every worker shapes with.
    /// - `thread_count`: Number of worker threads. `0` derives it from the CPU count.
    /// - `max_queued`: Maximum queued tasks. Excess submissions are rejected.
    /// - `result_capacity`: Bounded channel capacity for shaped chunks.
    pub fn new(
        generator: Arc<SkyGenerator>,
        thread_count: usize,
        max_queued: usize,
        result_capacity: usize,
    ) -> Self {
        let thread_count = if thread_count == 0 {
            default_thread_count()
        } else {
            thread_count
        };
        let (task_sender, task_receiver) = bounded::<ChunkCoord>(max_queued.max(1));
        let (result_sender, result_receiver) = bounded::<ShapedChunk>(result_capacity.max(1));

        let workers = (0..thread_count)
            .map(|i| {
                let receiver = task_receiver.clone();
                let sender = result_sender.clone();
                let generator = Arc::clone(&generator);

                std::thread::Builder::new()
                    .name(format!("shaping-worker-{i}"))
                    .spawn(move || {
                        while let Ok(coord) = receiver.recv() {
                            let start = std::time::Instant::now();
                            let mut chunk = Chunk::new(coord);
                            let result = generator.shape_chunk(&mut chunk).map(|()| chunk);
                            let elapsed = start.elapsed().as_micros() as u64;

                            let shaped = ShapedChunk {
                                coord,
                                result,
                                generation_time_us: elapsed,
                            };
                            if sender.send(shaped).is_err() {
                                break;
                            }
                        }
                    })
                    .expect("Failed to spawn chunk shaping worker thread")
            })
            .collect();

        tracing::debug!(thread_count, max_queued, "shaping pool started");

        Self {
            task_sender: Some(task_sender),
            result_receiver: Some(result_receiver),
            in_flight: AtomicU64::new(0),
            workers,
        }
    }

    /// Create a pool sized from the CPU count.
    pub fn with_defaults(generator: Arc<SkyGenerator>) -> Self {
        Self::new(generator, default_thread_count(), 64, 128)
    }

    /// Number of worker threads.
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a chunk for shaping.
    ///
    /// Returns `Ok(())` if the task was queued, or `Err(coord)` if the queue is full.
    pub fn submit(&self, coord: ChunkCoord) -> Result<(), ChunkCoord> {
        let Some(sender) = &self.task_sender else {
            return Err(coord);
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        sender.try_send(coord).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            e.into_inner()
        })
    }

    /// Wait for the next shaped chunk. Returns `None` once nothing is in flight.
    pub fn recv(&self) -> Option<ShapedChunk> {
        if self.in_flight_count() == 0 {
            return None;
        }
        let shaped = self.result_receiver.as_ref()?.recv().ok()?;
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        Some(shaped)
    }

    /// Drain all shaped chunks that are ready without waiting.
    pub fn drain_results(&self) -> Vec<ShapedChunk> {
        let mut results = Vec::new();
        if let Some(receiver) = &self.result_receiver {
            while let Ok(shaped) = receiver.try_recv() {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                results.push(shaped);
            }
        }
        results
    }

    /// Number of tasks submitted but not yet received.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }
}

impl Drop for ShapingPool {
    fn drop(&mut self) {
        // Closing both channels ends every worker loop.
        self.task_sender.take();
        self.result_receiver.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn default_thread_count() -> usize {
    let cpus = num_cpus::get().max(2);
    (cpus - 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyland_config::Config;
    use skyland_voxel::{BlockRegistry, ChunkStatus};

    use crate::seed::hash_chunk;

    fn generator() -> Arc<SkyGenerator> {
        Arc::new(SkyGenerator::new(42, &Config::default(), BlockRegistry::with_defaults()).unwrap())
    }

    #[test]
    fn test_every_submitted_chunk_comes_back() {
        let pool = ShapingPool::new(generator(), 4, 64, 64);
        let mut submitted = Vec::new();
        for x in -2..2 {
            for z in -2..2 {
                let coord = ChunkCoord::new(x, z);
                pool.submit(coord).unwrap();
                submitted.push(coord);
            }
        }

        let mut received = Vec::new();
        while let Some(shaped) = pool.recv() {
            let chunk = shaped.result.expect("shaping a fresh chunk cannot fail");
            assert_eq!(chunk.coord(), shaped.coord);
            assert_eq!(chunk.status(), ChunkStatus::Shaped);
            received.push(shaped.coord);
        }

        received.sort();
        submitted.sort();
        assert_eq!(received, submitted, "should receive all submitted chunks");
        assert_eq!(pool.in_flight_count(), 0);
    }

    #[test]
    fn test_pool_matches_synchronous_shaping() {
        let generator = generator();
        let pool = ShapingPool::new(Arc::clone(&generator), 3, 16, 16);
        let coord = ChunkCoord::new(1, -1);
        pool.submit(coord).unwrap();
        let shaped = pool.recv().unwrap().result.unwrap();

        let mut local = Chunk::new(coord);
        generator.shape_chunk(&mut local).unwrap();
        assert_eq!(hash_chunk(&shaped), hash_chunk(&local));
    }

    #[test]
    fn test_full_queue_rejects_submission() {
        let pool = ShapingPool::new(generator(), 1, 1, 1);
        let mut rejected = None;
        for x in 0..64 {
            if let Err(coord) = pool.submit(ChunkCoord::new(x, 0)) {
                rejected = Some(coord);
                break;
            }
        }
        let accepted = pool.in_flight_count();
        assert!(rejected.is_some(), "a one-slot queue must fill up");
        assert!(accepted >= 1);

        let mut received = 0;
        while pool.recv().is_some() {
            received += 1;
        }
        assert_eq!(received, accepted);
    }

    #[test]
    fn test_recv_on_idle_pool_returns_none() {
        let pool = ShapingPool::new(generator(), 1, 4, 4);
        assert!(pool.recv().is_none());
        assert!(pool.drain_results().is_empty());
        assert_eq!(pool.thread_count(), 1);
    }
}
