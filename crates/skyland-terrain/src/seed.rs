//! Per-chunk seed derivation and phase-tagged random streams.
//!
//! Every phase of every chunk draws from a stream seeded only from
//! `(world_seed, chunk_x, chunk_z)`, so the result of a phase never depends on
//! which chunks were processed before it.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skyland_voxel::{Chunk, ChunkCoord};

/// Constant mixed into every chunk seed.
pub const FIXED_SALT: u32 = 0xA6FE_78DC;

/// Derives the seed for one chunk.
///
/// `FIXED_SALT ^ (x << 8) ^ z ^ world_seed`, computed on sign-extended 64-bit
/// integers. Distant coordinates can collide; the formula is kept as is so
/// existing worlds stay stable.
pub fn chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    let x = i64::from(coord.x);
    let z = i64::from(coord.z);
    (i64::from(FIXED_SALT) ^ (x << 8) ^ z ^ world_seed as i64) as u64
}

/// The generation phase a stream was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Terrain shaping plus generation-time populators.
    Shaping,
    /// Ores, trees and biome decoration.
    Population,
}

/// A freshly seeded random stream for one phase of one chunk.
///
/// Only [`SeedScheduler::stream`] constructs these, so a stream can never be
/// carried over from another chunk or phase.
#[derive(Debug)]
pub struct RandomStream {
    rng: ChaCha8Rng,
    coord: ChunkCoord,
    phase: Phase,
}

impl RandomStream {
    /// The chunk this stream belongs to.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The phase this stream was issued for.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst);
    }
}

/// Issues reseeded streams for a world.
#[derive(Debug, Clone, Copy)]
pub struct SeedScheduler {
    world_seed: u64,
}

impl SeedScheduler {
    pub fn new(world_seed: u64) -> Self {
        Self { world_seed }
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// The chunk seed for `coord`; see [`chunk_seed`].
    pub fn seed_for(&self, coord: ChunkCoord) -> u64 {
        chunk_seed(self.world_seed, coord)
    }

    /// A stream seeded from scratch for `phase` of `coord`.
    pub fn stream(&self, coord: ChunkCoord, phase: Phase) -> RandomStream {
        let seed = self.seed_for(coord);
        tracing::trace!(%coord, ?phase, seed, "reseeding random stream");
        RandomStream {
            rng: ChaCha8Rng::seed_from_u64(seed),
            coord,
            phase,
        }
    }
}

/// Content hash of a chunk's blocks and biomes, for comparing generation
/// results across runs and threads.
pub fn hash_chunk(chunk: &Chunk) -> u64 {
    let mut hasher = DefaultHasher::new();
    chunk.coord().hash(&mut hasher);
    for (_, block) in chunk.iter() {
        block.hash(&mut hasher);
    }
    for x in 0..skyland_voxel::CHUNK_WIDTH {
        for z in 0..skyland_voxel::CHUNK_WIDTH {
            chunk.biome(x, z).hash(&mut hasher);
        }
    }
    hasher.finish()
}
