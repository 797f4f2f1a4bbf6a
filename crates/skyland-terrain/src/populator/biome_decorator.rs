//! Biome-specific decoration keyed off the chunk's center column.

use std::sync::Arc;

use rand::Rng;
use skyland_voxel::{BlockId, BlockRegistry, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord, ChunkSource};

use super::{Populator, amount};
use crate::biome::{BiomeRegistry, Decoration};
use crate::seed::RandomStream;

/// Local column whose biome selects the decorations.
pub const CENTER_COLUMN: (usize, usize) = (7, 7);

/// Runs the decorations of the biome at [`CENTER_COLUMN`].
pub struct BiomeDecorator {
    blocks: Arc<BlockRegistry>,
    biomes: Arc<BiomeRegistry>,
}

impl BiomeDecorator {
    pub fn new(blocks: Arc<BlockRegistry>, biomes: Arc<BiomeRegistry>) -> Self {
        Self { blocks, biomes }
    }

    /// Decorates `chunk`. Returns the number of blocks placed.
    pub fn decorate(&self, chunk: &mut Chunk, rng: &mut RandomStream) -> usize {
        let (cx, cz) = CENTER_COLUMN;
        let id = chunk.biome(cx, cz);
        let Some(biome) = self.biomes.get(id) else {
            tracing::debug!(coord = %chunk.coord(), biome = id.0, "no decorations for unknown biome");
            return 0;
        };

        let mut placed = 0;
        for decoration in &biome.decorations {
            placed += match *decoration {
                Decoration::Scatter {
                    block,
                    on,
                    base_amount,
                    random_amount,
                } => {
                    let count = amount(rng, base_amount, random_amount);
                    self.scatter(chunk, rng, block, on, count)
                }
            };
        }
        placed
    }

    fn scatter(
        &self,
        chunk: &mut Chunk,
        rng: &mut RandomStream,
        block: BlockId,
        on: BlockId,
        count: u32,
    ) -> usize {
        let mut placed = 0;
        for _ in 0..count {
            let x = rng.random_range(0..CHUNK_WIDTH);
            let z = rng.random_range(0..CHUNK_WIDTH);
            let Some(y) = chunk.highest_matching(x, z, |b| !self.blocks.is_transparent(b)) else {
                continue;
            };
            if chunk.get(x, y, z) != on || y + 1 >= CHUNK_HEIGHT || !chunk.get(x, y + 1, z).is_air() {
                continue;
            }
            chunk.set(x, y + 1, z, block);
            placed += 1;
        }
        placed
    }
}

impl Populator for BiomeDecorator {
    fn name(&self) -> &'static str {
        "biome_decoration"
    }

    fn populate(&self, world: &mut dyn ChunkSource, coord: ChunkCoord, rng: &mut RandomStream) {
        let Some(chunk) = world.chunk_mut(coord) else {
            tracing::warn!(%coord, "biome decoration skipped: chunk not loaded");
            return;
        };
        let placed = self.decorate(chunk, rng);
        tracing::debug!(%coord, placed, "biome decorations placed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeDef, BiomeId};
    use crate::seed::{Phase, SeedScheduler};

    struct Fixture {
        decorator: BiomeDecorator,
        grass: BlockId,
        stone: BlockId,
        tall_grass: BlockId,
    }

    fn fixture() -> Fixture {
        let blocks = BlockRegistry::with_defaults();
        let id = |name: &str| blocks.lookup_by_name(name).unwrap();
        let (grass, stone, tall_grass) = (id("grass"), id("stone"), id("tall_grass"));
        let mut biomes = BiomeRegistry::new();
        biomes
            .register(BiomeDef {
                id: BiomeId(1),
                name: "sky".to_string(),
                ground_cover: vec![grass],
                decorations: vec![Decoration::Scatter {
                    block: tall_grass,
                    on: grass,
                    base_amount: 30,
                    random_amount: 0,
                }],
            })
            .unwrap();
        Fixture {
            decorator: BiomeDecorator::new(Arc::new(blocks), Arc::new(biomes)),
            grass,
            stone,
            tall_grass,
        }
    }

    fn surface(top: BlockId, biome: BiomeId) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                chunk.set(x, 30, z, top);
                chunk.set_biome(x, z, biome);
            }
        }
        chunk
    }

    fn stream() -> RandomStream {
        SeedScheduler::new(11).stream(ChunkCoord::new(0, 0), Phase::Population)
    }

    #[test]
    fn test_scatter_places_on_matching_surface() {
        let f = fixture();
        let mut chunk = surface(f.grass, BiomeId(1));
        let placed = f.decorator.decorate(&mut chunk, &mut stream());

        assert!(placed > 0);
        assert_eq!(chunk.count(f.tall_grass), placed);
        for ((_, y, _), block) in chunk.iter() {
            if block == f.tall_grass {
                assert_eq!(y, 31, "tall grass sits directly on the surface");
            }
        }
    }

    #[test]
    fn test_scatter_skips_other_surfaces() {
        let f = fixture();
        let mut chunk = surface(f.stone, BiomeId(1));
        assert_eq!(f.decorator.decorate(&mut chunk, &mut stream()), 0);
    }

    #[test]
    fn test_unknown_center_biome_decorates_nothing() {
        let f = fixture();
        let mut chunk = surface(f.grass, BiomeId(1));
        chunk.set_biome(7, 7, BiomeId(42));
        assert_eq!(f.decorator.decorate(&mut chunk, &mut stream()), 0);
        assert_eq!(chunk.count(f.tall_grass), 0);
    }
}
