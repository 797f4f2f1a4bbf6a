//! Fixed-size 16×128×16 chunk storage with per-column biome ids and a
//! generation status.
//!
//! Blocks are stored column-major: the 128 cells of one `(x, z)` column are
//! contiguous, so surface scans and column writes touch a single slice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::BlockId;

/// Chunk extent along X and Z, in blocks.
pub const CHUNK_WIDTH: usize = 16;

/// Chunk extent along Y, in blocks.
pub const CHUNK_HEIGHT: usize = 128;

/// Number of `(x, z)` columns in a chunk.
pub const COLUMN_COUNT: usize = CHUNK_WIDTH * CHUNK_WIDTH;

/// Total number of voxels in a chunk (16 × 128 × 16).
pub const CHUNK_VOLUME: usize = COLUMN_COUNT * CHUNK_HEIGHT;

/// Per-column biome identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeId(pub u8);

/// Identifies a chunk by its column-grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate offset by `(dx, dz)` chunks.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// World block coordinates `(wx, wz)` of local column `(0, 0)`.
    pub fn world_origin(self) -> (i64, i64) {
        (
            i64::from(self.x) * CHUNK_WIDTH as i64,
            i64::from(self.z) * CHUNK_WIDTH as i64,
        )
    }

    /// The chunk containing world column `(wx, wz)`.
    pub fn containing(wx: i64, wz: i64) -> Self {
        Self {
            x: wx.div_euclid(CHUNK_WIDTH as i64) as i32,
            z: wz.div_euclid(CHUNK_WIDTH as i64) as i32,
        }
    }

    /// Iterates over the eight surrounding chunk coordinates.
    pub fn neighbors(self) -> impl Iterator<Item = ChunkCoord> {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| dx != 0 || dz != 0)
            .map(move |(dx, dz)| self.offset(dx, dz))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Where a chunk is in its generation lifecycle. Each transition runs once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkStatus {
    /// Freshly allocated, all air.
    #[default]
    Unshaped,
    /// Terrain shaped and ground cover applied.
    Shaped,
    /// Ores, trees and biome decoration placed.
    Populated,
}

impl fmt::Display for ChunkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unshaped => "unshaped",
            Self::Shaped => "shaped",
            Self::Populated => "populated",
        };
        f.write_str(name)
    }
}

/// A 16×128×16 block grid plus one biome id per column.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Vec<BlockId>,
    biomes: [BiomeId; COLUMN_COUNT],
    status: ChunkStatus,
}

impl Chunk {
    /// Creates an unshaped chunk filled with air.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockId::AIR; CHUNK_VOLUME],
            biomes: [BiomeId::default(); COLUMN_COUNT],
            status: ChunkStatus::Unshaped,
        }
    }

    /// The coordinate this chunk was allocated for.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ChunkStatus {
        self.status
    }

    /// Advances the lifecycle status.
    pub fn set_status(&mut self, status: ChunkStatus) {
        self.status = status;
    }

    /// Checks whether `(x, y, z)` addresses a cell of this chunk.
    pub fn in_bounds(x: usize, y: usize, z: usize) -> bool {
        x < CHUNK_WIDTH && y < CHUNK_HEIGHT && z < CHUNK_WIDTH
    }

    /// Returns the block at `(x, y, z)`.
    ///
    /// Returns air if any coordinate is out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if !Self::in_bounds(x, y, z) {
            tracing::warn!("Chunk::get out of bounds: ({}, {}, {})", x, y, z);
            return BlockId::AIR;
        }
        self.blocks[Self::linear_index(x, y, z)]
    }

    /// Sets the block at `(x, y, z)`.
    ///
    /// No-op with a warning log if any coordinate is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        if !Self::in_bounds(x, y, z) {
            tracing::warn!("Chunk::set out of bounds: ({}, {}, {})", x, y, z);
            return;
        }
        self.blocks[Self::linear_index(x, y, z)] = block;
    }

    /// The 128 blocks of column `(x, z)`, bottom first.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `z` is not below [`CHUNK_WIDTH`].
    pub fn column(&self, x: usize, z: usize) -> &[BlockId] {
        let start = Self::linear_index(x, 0, z);
        &self.blocks[start..start + CHUNK_HEIGHT]
    }

    /// Biome of column `(x, z)`. Out-of-range columns report the default biome.
    pub fn biome(&self, x: usize, z: usize) -> BiomeId {
        if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
            return BiomeId::default();
        }
        self.biomes[x * CHUNK_WIDTH + z]
    }

    /// Assigns the biome of column `(x, z)`.
    pub fn set_biome(&mut self, x: usize, z: usize, biome: BiomeId) {
        if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
            tracing::warn!("Chunk::set_biome out of bounds: ({}, {})", x, z);
            return;
        }
        self.biomes[x * CHUNK_WIDTH + z] = biome;
    }

    /// Height of the topmost block in column `(x, z)` matching `pred`.
    pub fn highest_matching(
        &self,
        x: usize,
        z: usize,
        pred: impl Fn(BlockId) -> bool,
    ) -> Option<usize> {
        if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
            return None;
        }
        self.column(x, z).iter().rposition(|&b| pred(b))
    }

    /// Counts the cells holding `block`.
    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }

    /// Counts the non-air cells.
    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    /// Iterates over all cells as `((x, y, z), block)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), BlockId)> + '_ {
        self.blocks.iter().enumerate().map(|(i, &b)| {
            let y = i % CHUNK_HEIGHT;
            let column = i / CHUNK_HEIGHT;
            ((column / CHUNK_WIDTH, y, column % CHUNK_WIDTH), b)
        })
    }

    /// Converts `(x, y, z)` to a linear index (y varies fastest).
    fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(Self::in_bounds(x, y, z));
        (x * CHUNK_WIDTH + z) * CHUNK_HEIGHT + y
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("status", &self.status)
            .field("non_air", &self.count_non_air())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_unshaped_air() {
        let chunk = Chunk::new(ChunkCoord::new(3, -2));
        assert_eq!(chunk.status(), ChunkStatus::Unshaped);
        assert_eq!(chunk.count_non_air(), 0);
        assert_eq!(chunk.coord(), ChunkCoord::new(3, -2));
    }

    #[test]
    fn test_set_then_get() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set(15, 127, 15, BlockId(4));
        chunk.set(0, 0, 0, BlockId(2));
        assert_eq!(chunk.get(15, 127, 15), BlockId(4));
        assert_eq!(chunk.get(0, 0, 0), BlockId(2));
        assert_eq!(chunk.get(0, 1, 0), BlockId::AIR);
        assert_eq!(chunk.count_non_air(), 2);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set(16, 0, 0, BlockId(1));
        chunk.set(0, 128, 0, BlockId(1));
        assert_eq!(chunk.count_non_air(), 0);
        assert_eq!(chunk.get(0, 200, 0), BlockId::AIR);
    }

    #[test]
    fn test_column_is_contiguous() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set(4, 10, 9, BlockId(7));
        let column = chunk.column(4, 9);
        assert_eq!(column.len(), CHUNK_HEIGHT);
        assert_eq!(column[10], BlockId(7));
        assert_eq!(chunk.highest_matching(4, 9, |b| !b.is_air()), Some(10));
        assert_eq!(chunk.highest_matching(5, 9, |b| !b.is_air()), None);
    }

    #[test]
    fn test_biome_per_column() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set_biome(7, 7, BiomeId(1));
        assert_eq!(chunk.biome(7, 7), BiomeId(1));
        assert_eq!(chunk.biome(7, 8), BiomeId(0));
    }

    #[test]
    fn test_iter_reports_local_positions() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set(3, 50, 11, BlockId(9));
        let found: Vec<_> = chunk.iter().filter(|(_, b)| *b == BlockId(9)).collect();
        assert_eq!(found, vec![((3, 50, 11), BlockId(9))]);
    }

    #[test]
    fn test_coord_world_origin_and_containing() {
        assert_eq!(ChunkCoord::new(-1, 2).world_origin(), (-16, 32));
        assert_eq!(ChunkCoord::containing(-1, 31), ChunkCoord::new(-1, 1));
        assert_eq!(ChunkCoord::containing(-16, 0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::containing(-17, 0), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn test_neighbors_are_eight_distinct() {
        let center = ChunkCoord::new(5, 5);
        let neighbors: Vec<_> = center.neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
        assert!(neighbors.contains(&ChunkCoord::new(4, 6)));
    }
}
