//! Deterministic floating-island terrain: noise field, island shaping, seed
//! scheduling and the ground cover, ore, tree and biome populators.

mod error;
mod generator;
mod kernel;
mod noise_field;
mod pool;
mod seed;
mod settings;
mod shaper;

pub mod biome;
pub mod populator;

pub use biome::{BiomeDef, BiomeId, BiomeRegistry, BiomeRegistryError, Decoration};
pub use error::GeneratorError;
pub use generator::{GENERATOR_NAME, SkyGenerator};
pub use kernel::{KERNEL_RADIUS, KERNEL_SIZE, gaussian_kernel, kernel_weight};
pub use noise_field::{NoiseField, NoiseParams, NoiseSample};
pub use pool::{ShapedChunk, ShapingPool};
pub use seed::{FIXED_SALT, Phase, RandomStream, SeedScheduler, chunk_seed, hash_chunk};
pub use settings::SkySettings;
pub use shaper::{CHUNK_BOX, ShapingParams, TerrainShaper, base_density, is_solid, island_distance};
