//! Chunk decorators run after shaping.
//!
//! Two fixed pipelines exist. Generation-time runs ground cover right after
//! shaping; population-time runs ores, trees, then biome decoration once every
//! neighbor chunk exists. Populators only touch chunks the [`ChunkSource`]
//! already holds and never cause generation.

mod biome_decorator;
mod ground_cover;
mod ore;
mod tree;

pub use biome_decorator::BiomeDecorator;
pub use ground_cover::GroundCover;
pub use ore::{OreReport, OreSeeder, OreSpecification};
pub use tree::{TreePlacer, TreeSettings};

use rand::Rng;
use skyland_voxel::{ChunkCoord, ChunkSource};

use crate::seed::RandomStream;

/// A decorator applied to one chunk with a freshly seeded stream.
pub trait Populator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Decorates the chunk at `coord`. Missing chunks are left alone.
    fn populate(&self, world: &mut dyn ChunkSource, coord: ChunkCoord, rng: &mut RandomStream);
}

/// `base + uniform[0, random]`.
pub(crate) fn amount(rng: &mut RandomStream, base: u32, random: u32) -> u32 {
    base + rng.random_range(0..=random)
}
