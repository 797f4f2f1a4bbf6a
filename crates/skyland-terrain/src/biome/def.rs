//! Biome definition: the resolved content of a single biome.

use skyland_voxel::{BiomeId, BlockId};

/// Full descriptor for a biome type, with every block name resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    /// Id written into chunk columns.
    pub id: BiomeId,
    /// Human-readable biome name (e.g., "sky").
    pub name: String,
    /// Ground cover template, top first. Non-solid entries clear their cell.
    pub ground_cover: Vec<BlockId>,
    /// Decorations run during population, in order.
    pub decorations: Vec<Decoration>,
}

/// A population-time biome decoration.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoration {
    /// Place `block` on top of random columns whose surface block is `on`.
    Scatter {
        block: BlockId,
        on: BlockId,
        base_amount: u32,
        random_amount: u32,
    },
}
