//! The sky-island generator: shaping plus the two populator pipelines.

use std::sync::Arc;

use glam::IVec3;
use skyland_config::Config;
use skyland_voxel::{BlockRegistry, Chunk, ChunkCoord, ChunkSource, ChunkStatus};

use crate::error::GeneratorError;
use crate::kernel::gaussian_kernel;
use crate::noise_field::NoiseField;
use crate::populator::{BiomeDecorator, GroundCover, OreSeeder, Populator, TreePlacer};
use crate::seed::{Phase, SeedScheduler};
use crate::settings::SkySettings;
use crate::shaper::TerrainShaper;

/// Name reported to the host.
pub const GENERATOR_NAME: &str = "Sky";

/// Deterministic floating-island chunk generator.
///
/// All methods take `&self`; chunk state always comes from the caller, so one
/// generator can be shared across threads behind an [`Arc`].
pub struct SkyGenerator {
    scheduler: SeedScheduler,
    shaper: TerrainShaper,
    settings: SkySettings,
    blocks: Arc<BlockRegistry>,
    /// Run right after shaping.
    generation: Vec<Box<dyn Populator>>,
    /// Run once all neighbors exist, in order.
    population: Vec<Box<dyn Populator>>,
}

impl SkyGenerator {
    /// Builds the generator for a world.
    ///
    /// # Errors
    ///
    /// Any [`GeneratorError`] raised while resolving and validating `config`.
    pub fn new(world_seed: u64, config: &Config, blocks: BlockRegistry) -> Result<Self, GeneratorError> {
        let settings = SkySettings::from_config(config, &blocks)?;
        let blocks = Arc::new(blocks);
        let biomes = Arc::new(settings.biomes.clone());

        let noise = NoiseField::new(world_seed, settings.noise.clone());
        let shaper = TerrainShaper::new(noise, settings.shaping.clone());

        let generation: Vec<Box<dyn Populator>> = vec![Box::new(GroundCover::new(
            Arc::clone(&blocks),
            Arc::clone(&biomes),
        ))];
        let population: Vec<Box<dyn Populator>> = vec![
            Box::new(OreSeeder::new(
                settings.ores.clone(),
                settings.shaping.solid_block,
            )),
            Box::new(TreePlacer::new(settings.trees.clone(), Arc::clone(&blocks))),
            Box::new(BiomeDecorator::new(Arc::clone(&blocks), biomes)),
        ];

        // Build the shared kernel before any worker can race on it.
        let _ = gaussian_kernel();

        tracing::info!(
            world_seed,
            ores = settings.ores.len(),
            biomes = settings.biomes.len(),
            "sky generator ready"
        );

        Ok(Self {
            scheduler: SeedScheduler::new(world_seed),
            shaper,
            settings,
            blocks,
            generation,
            population,
        })
    }

    /// Builds the generator for the world behind `source`, using its seed.
    pub fn init(source: &dyn ChunkSource, config: &Config, blocks: BlockRegistry) -> Result<Self, GeneratorError> {
        Self::new(source.seed(), config, blocks)
    }

    pub fn name(&self) -> &'static str {
        GENERATOR_NAME
    }

    pub fn world_seed(&self) -> u64 {
        self.scheduler.world_seed()
    }

    pub fn water_height(&self) -> i32 {
        self.settings.water_height
    }

    /// Fixed world spawn point.
    pub fn spawn(&self) -> IVec3 {
        self.settings.spawn
    }

    pub fn settings(&self) -> &SkySettings {
        &self.settings
    }

    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    pub fn scheduler(&self) -> &SeedScheduler {
        &self.scheduler
    }

    /// Shapes a fresh chunk and applies the generation-time populators.
    /// Touches nothing but `chunk`.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::PhaseOrder`] unless the chunk is
    /// [`ChunkStatus::Unshaped`].
    pub fn shape_chunk(&self, chunk: &mut Chunk) -> Result<(), GeneratorError> {
        let coord = chunk.coord();
        expect_status(chunk, ChunkStatus::Unshaped)?;

        let mut rng = self.scheduler.stream(coord, Phase::Shaping);
        let solid = self.shaper.shape(coord, chunk);

        let mut single = SingleChunk {
            seed: self.world_seed(),
            chunk: &mut *chunk,
        };
        for populator in &self.generation {
            populator.populate(&mut single, coord, &mut rng);
        }

        chunk.set_status(ChunkStatus::Shaped);
        tracing::debug!(%coord, solid, "chunk shaped");
        Ok(())
    }

    /// Shapes the already-allocated chunk at `coord`.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::MissingChunk`] if `world` does not hold the chunk,
    /// otherwise as [`SkyGenerator::shape_chunk`].
    pub fn generate_chunk(&self, world: &mut dyn ChunkSource, coord: ChunkCoord) -> Result<(), GeneratorError> {
        let chunk = world
            .chunk_mut(coord)
            .ok_or(GeneratorError::MissingChunk(coord))?;
        self.shape_chunk(chunk)
    }

    /// Runs ores, trees and biome decoration on a shaped chunk.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::MissingChunk`] if `world` does not hold the chunk,
    /// [`GeneratorError::PhaseOrder`] unless it is [`ChunkStatus::Shaped`].
    pub fn populate_chunk(&self, world: &mut dyn ChunkSource, coord: ChunkCoord) -> Result<(), GeneratorError> {
        let chunk = world.chunk(coord).ok_or(GeneratorError::MissingChunk(coord))?;
        expect_status(chunk, ChunkStatus::Shaped)?;

        let mut rng = self.scheduler.stream(coord, Phase::Population);
        for populator in &self.population {
            tracing::trace!(%coord, populator = populator.name(), "running populator");
            populator.populate(world, coord, &mut rng);
        }

        if let Some(chunk) = world.chunk_mut(coord) {
            chunk.set_status(ChunkStatus::Populated);
        }
        tracing::debug!(%coord, "chunk populated");
        Ok(())
    }
}

fn expect_status(chunk: &Chunk, expected: ChunkStatus) -> Result<(), GeneratorError> {
    if chunk.status() == expected {
        Ok(())
    } else {
        Err(GeneratorError::PhaseOrder {
            coord: chunk.coord(),
            expected,
            found: chunk.status(),
        })
    }
}

/// Exposes exactly one chunk to the generation-time populators.
struct SingleChunk<'a> {
    seed: u64,
    chunk: &'a mut Chunk,
}

impl ChunkSource for SingleChunk<'_> {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        (self.chunk.coord() == coord).then_some(&*self.chunk)
    }

    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        (self.chunk.coord() == coord).then_some(&mut *self.chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyland_voxel::ChunkManager;

    fn generator(seed: u64) -> SkyGenerator {
        SkyGenerator::new(seed, &Config::default(), BlockRegistry::with_defaults()).unwrap()
    }

    #[test]
    fn test_descriptive_accessors() {
        let generator = generator(1);
        assert_eq!(generator.name(), "Sky");
        assert_eq!(generator.water_height(), 0);
        assert_eq!(generator.spawn(), IVec3::new(0, 64, 64));
        assert_eq!(generator.world_seed(), 1);
        assert_eq!(generator.settings().ores.len(), 11);
    }

    #[test]
    fn test_init_uses_source_seed() {
        let world = ChunkManager::new(77);
        let generator =
            SkyGenerator::init(&world, &Config::default(), BlockRegistry::with_defaults()).unwrap();
        assert_eq!(generator.world_seed(), 77);
    }

    #[test]
    fn test_generator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SkyGenerator>();
    }

    #[test]
    fn test_shape_marks_chunk_shaped() {
        let generator = generator(5);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        generator.shape_chunk(&mut chunk).unwrap();
        assert_eq!(chunk.status(), ChunkStatus::Shaped);
    }

    #[test]
    fn test_reshaping_is_rejected() {
        let generator = generator(5);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        generator.shape_chunk(&mut chunk).unwrap();
        let snapshot = chunk.clone();

        let err = generator.shape_chunk(&mut chunk).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::PhaseOrder {
                expected: ChunkStatus::Unshaped,
                found: ChunkStatus::Shaped,
                ..
            }
        ));
        assert_eq!(chunk, snapshot, "a rejected phase must not modify the chunk");
    }

    #[test]
    fn test_generate_missing_chunk_is_fatal() {
        let generator = generator(5);
        let mut world = ChunkManager::new(5);
        let coord = ChunkCoord::new(3, 3);
        assert!(matches!(
            generator.generate_chunk(&mut world, coord),
            Err(GeneratorError::MissingChunk(c)) if c == coord
        ));
        assert!(!world.contains(coord), "generation must not allocate chunks");
    }

    #[test]
    fn test_populate_requires_shaped() {
        let generator = generator(5);
        let mut world = ChunkManager::new(5);
        let coord = ChunkCoord::new(0, 0);
        world.allocate(coord);

        assert!(matches!(
            generator.populate_chunk(&mut world, coord),
            Err(GeneratorError::PhaseOrder { expected: ChunkStatus::Shaped, .. })
        ));

        generator.generate_chunk(&mut world, coord).unwrap();
        generator.populate_chunk(&mut world, coord).unwrap();
        assert_eq!(world.chunk(coord).unwrap().status(), ChunkStatus::Populated);

        assert!(generator.populate_chunk(&mut world, coord).is_err());
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let mut config = Config::default();
        config.ores[0].min_height = 100;
        config.ores[0].max_height = 10;
        assert!(SkyGenerator::new(0, &config, BlockRegistry::with_defaults()).is_err());
    }
}
