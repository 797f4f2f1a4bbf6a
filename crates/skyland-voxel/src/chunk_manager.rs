//! Chunk ownership and world-coordinate access.
//!
//! [`ChunkSource`] is the seam between the generator and whatever owns the
//! chunks. It only hands out chunks that already exist; it never creates one,
//! so decoration can never recurse into generation. [`ChunkManager`] is the
//! in-memory implementation, keyed by [`ChunkCoord`] in an
//! [`FxHashMap`](rustc_hash::FxHashMap).

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord};
use crate::registry::BlockId;

/// Why a single block placement was not performed. Never fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementSkipped {
    /// The position lies outside the allowed area or height range.
    #[error("position out of range")]
    OutOfRange,
    /// The target cell holds a block the placement may not replace.
    #[error("position occupied")]
    Occupied,
    /// The chunk holding the position has not been generated.
    #[error("chunk not generated")]
    MissingChunk,
}

/// Access to already-generated chunks plus the world seed.
pub trait ChunkSource {
    /// The world seed. Constant for the lifetime of the world.
    fn seed(&self) -> u64;

    /// Immutable access to a generated chunk.
    fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk>;

    /// Mutable access to a generated chunk.
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk>;

    /// Block at world position `(wx, y, wz)`, or `None` when the position is
    /// outside the world height or its chunk does not exist.
    fn block_at(&self, wx: i64, y: i64, wz: i64) -> Option<BlockId> {
        let (coord, lx, ly, lz) = split_world(wx, y, wz)?;
        self.chunk(coord).map(|chunk| chunk.get(lx, ly, lz))
    }

    /// Writes a block at world position `(wx, y, wz)`.
    ///
    /// # Errors
    ///
    /// [`PlacementSkipped::OutOfRange`] outside the world height,
    /// [`PlacementSkipped::MissingChunk`] when the chunk is not generated.
    fn set_block_at(
        &mut self,
        wx: i64,
        y: i64,
        wz: i64,
        block: BlockId,
    ) -> Result<(), PlacementSkipped> {
        let (coord, lx, ly, lz) = split_world(wx, y, wz).ok_or(PlacementSkipped::OutOfRange)?;
        let chunk = self
            .chunk_mut(coord)
            .ok_or(PlacementSkipped::MissingChunk)?;
        chunk.set(lx, ly, lz, block);
        Ok(())
    }

    /// Height of the topmost block in world column `(wx, wz)` matching `pred`.
    fn highest_block_at(&self, wx: i64, wz: i64, pred: &dyn Fn(BlockId) -> bool) -> Option<i64> {
        let (coord, lx, _, lz) = split_world(wx, 0, wz)?;
        self.chunk(coord)?
            .highest_matching(lx, lz, pred)
            .map(|y| y as i64)
    }
}

/// Splits a world position into its chunk and chunk-local cell.
pub fn split_world(wx: i64, y: i64, wz: i64) -> Option<(ChunkCoord, usize, usize, usize)> {
    if !(0..CHUNK_HEIGHT as i64).contains(&y) {
        return None;
    }
    let coord = ChunkCoord::containing(wx, wz);
    let lx = wx.rem_euclid(CHUNK_WIDTH as i64) as usize;
    let lz = wz.rem_euclid(CHUNK_WIDTH as i64) as usize;
    Some((coord, lx, y as usize, lz))
}

/// Owns all currently-loaded chunks of one world and provides fast access by
/// [`ChunkCoord`].
pub struct ChunkManager {
    seed: u64,
    chunks: FxHashMap<ChunkCoord, Chunk>,
}

impl ChunkManager {
    /// Creates an empty chunk manager for a world with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chunks: FxHashMap::default(),
        }
    }

    /// Inserts a chunk at its own coordinate.
    ///
    /// If a chunk already exists there it is replaced.
    pub fn load_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord(), chunk);
    }

    /// Allocates an unshaped chunk at `coord` if none is loaded yet and
    /// returns it.
    pub fn allocate(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord))
    }

    /// Removes and returns the chunk at the given coordinate.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Returns `true` if a chunk is loaded at `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Returns `true` if all eight neighbours of `coord` are loaded.
    pub fn has_all_neighbors(&self, coord: ChunkCoord) -> bool {
        coord.neighbors().all(|n| self.contains(n))
    }

    /// Number of currently loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over all loaded chunk coordinates.
    pub fn loaded_coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Iterates over all loaded `(coordinate, chunk)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }
}

impl ChunkSource for ChunkManager {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
