//! Biome catalog: ground cover templates and population-time decorations.
//!
//! Biomes are data. Every table the populators consult is built from the
//! configuration when the generator is constructed and never mutated after.

mod def;
mod registry;

pub use def::{BiomeDef, Decoration};
pub use registry::{BiomeRegistry, BiomeRegistryError};
pub use skyland_voxel::BiomeId;
