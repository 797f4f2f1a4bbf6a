//! Generator error types.

use skyland_voxel::{ChunkCoord, ChunkStatus};

use crate::biome::BiomeRegistryError;

/// Errors raised while building the generator or driving a chunk through its
/// phases. Skipped block placements are not errors; see
/// [`PlacementSkipped`](skyland_voxel::PlacementSkipped).
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A configured table entry cannot be honored (e.g. an ore height range
    /// outside the chunk).
    #[error("invalid specification `{name}`: {reason}")]
    InvalidSpecification {
        /// Which entry is invalid.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A block name is not in the block catalog.
    #[error("unknown block `{0}`")]
    UnknownBlock(String),

    /// The driver asked for a chunk it never allocated.
    #[error("chunk {0} does not exist")]
    MissingChunk(ChunkCoord),

    /// A phase was invoked on a chunk in the wrong lifecycle state.
    #[error("chunk {coord} is {found}, expected {expected}")]
    PhaseOrder {
        /// The chunk.
        coord: ChunkCoord,
        /// Status the phase requires.
        expected: ChunkStatus,
        /// Status the chunk has.
        found: ChunkStatus,
    },

    /// The biome table is inconsistent.
    #[error(transparent)]
    Biome(#[from] BiomeRegistryError),
}

impl GeneratorError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
