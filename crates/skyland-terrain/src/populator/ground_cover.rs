//! Biome ground cover laid over the topmost opaque block of each column.

use std::sync::Arc;

use skyland_voxel::{BlockId, BlockRegistry, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord, ChunkSource};

use super::Populator;
use crate::biome::BiomeRegistry;
use crate::seed::RandomStream;

/// Applies each column's biome ground cover template.
pub struct GroundCover {
    blocks: Arc<BlockRegistry>,
    biomes: Arc<BiomeRegistry>,
}

impl GroundCover {
    pub fn new(blocks: Arc<BlockRegistry>, biomes: Arc<BiomeRegistry>) -> Self {
        Self { blocks, biomes }
    }

    /// Covers every column of `chunk`. Returns the number of columns touched.
    pub fn cover_chunk(&self, chunk: &mut Chunk) -> usize {
        let mut covered = 0;
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                let Some(biome) = self.biomes.get(chunk.biome(x, z)) else {
                    continue;
                };
                if self.cover_column(chunk, x, z, &biome.ground_cover) {
                    covered += 1;
                }
            }
        }
        covered
    }

    fn cover_column(&self, chunk: &mut Chunk, x: usize, z: usize, cover: &[BlockId]) -> bool {
        let Some(&first) = cover.first() else {
            return false;
        };
        let Some(top) = chunk.highest_matching(x, z, |b| !self.blocks.is_transparent(b)) else {
            return false;
        };

        // A non-solid first entry sits on top of the surface instead of replacing it.
        let lift = usize::from(!self.blocks.is_solid(first));
        let start = (top + lift).min(CHUNK_HEIGHT - 1);

        for (depth, &block) in cover.iter().enumerate() {
            let Some(y) = start.checked_sub(depth) else {
                break;
            };
            if chunk.get(x, y, z).is_air() && self.blocks.is_solid(block) {
                break;
            }
            chunk.set(x, y, z, block);
        }
        true
    }
}

impl Populator for GroundCover {
    fn name(&self) -> &'static str {
        "ground_cover"
    }

    fn populate(&self, world: &mut dyn ChunkSource, coord: ChunkCoord, _rng: &mut RandomStream) {
        let Some(chunk) = world.chunk_mut(coord) else {
            tracing::warn!(%coord, "ground cover skipped: chunk not loaded");
            return;
        };
        let covered = self.cover_chunk(chunk);
        tracing::trace!(%coord, covered, "ground cover applied");
    }
}
