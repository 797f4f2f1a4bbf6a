//! Block catalog, fixed-size chunk storage, and chunk ownership for the sky-island generator.

pub mod chunk;
pub mod chunk_manager;
pub mod registry;

pub use chunk::{
    BiomeId, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, COLUMN_COUNT, Chunk, ChunkCoord, ChunkStatus,
};
pub use chunk_manager::{ChunkManager, ChunkSource, PlacementSkipped, split_world};
pub use registry::{BlockDef, BlockId, BlockRegistry, RegistryError, Transparency};
