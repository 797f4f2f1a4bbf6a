//! Resolves a [`Config`] against the block catalog into validated settings.
//!
//! Every block name is looked up and every table row is checked here, once,
//! so the generation paths never see an invalid value.

use glam::{DVec3, IVec3};
use skyland_config::{BiomeConfig, Config, DecorationConfig};
use skyland_voxel::{BiomeId, BlockId, BlockRegistry};

use crate::biome::{BiomeDef, BiomeRegistry, Decoration};
use crate::error::GeneratorError;
use crate::noise_field::NoiseParams;
use crate::populator::{OreSpecification, TreeSettings};
use crate::shaper::{CHUNK_BOX, ShapingParams};

/// Validated generator settings.
#[derive(Clone, Debug)]
pub struct SkySettings {
    pub noise: NoiseParams,
    pub shaping: ShapingParams,
    /// Ore table in seeding order.
    pub ores: Vec<OreSpecification>,
    pub trees: TreeSettings,
    pub biomes: BiomeRegistry,
    pub water_height: i32,
    pub spawn: IVec3,
}

impl SkySettings {
    /// Builds and validates settings.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnknownBlock`] for a block name missing from
    /// `blocks`, [`GeneratorError::InvalidSpecification`] for out-of-range
    /// values, and [`GeneratorError::Biome`] for duplicate biomes.
    pub fn from_config(config: &Config, blocks: &BlockRegistry) -> Result<Self, GeneratorError> {
        let resolve = |name: &str| resolve_block(blocks, name);

        let noise = NoiseParams {
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            expansion: config.noise.expansion,
            sampling: config.noise.sampling,
        };
        noise.validate(CHUNK_BOX)?;

        let s = &config.shaping;
        let shaping = ShapingParams {
            empty_height: s.empty_height,
            empty_amplitude: s.empty_amplitude,
            density: s.density,
            island_center: DVec3::from_array(s.island_center),
            y_compression: s.y_compression,
            inner_radius: s.inner_radius,
            outer_radius: s.outer_radius,
            outer_threshold: s.outer_threshold,
            solid_block: resolve(&s.solid_block)?,
            biome: BiomeId(s.biome_id),
        };
        shaping.validate()?;

        let ores = config
            .ores
            .iter()
            .map(|ore| -> Result<OreSpecification, GeneratorError> {
                let spec = OreSpecification {
                    name: ore.block.clone(),
                    block: resolve(&ore.block)?,
                    cluster_count: ore.cluster_count,
                    cluster_size: ore.cluster_size,
                    min_height: ore.min_height,
                    max_height: ore.max_height,
                };
                spec.validate()?;
                Ok(spec)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let t = &config.trees;
        let trees = TreeSettings {
            base_amount: t.base_amount,
            random_amount: t.random_amount,
            log: resolve(&t.log_block)?,
            leaves: resolve(&t.leaves_block)?,
            soil: resolve(&t.soil_block)?,
            workable: t
                .workable
                .iter()
                .map(|name| resolve(name))
                .collect::<Result<_, _>>()?,
        };
        trees.validate()?;

        let mut biomes = BiomeRegistry::new();
        for biome in &config.biomes {
            biomes.register(resolve_biome(blocks, biome)?)?;
        }
        if biomes.get(shaping.biome).is_none() {
            return Err(GeneratorError::invalid(
                "shaping",
                format!("biome_id {} is not in the biome table", s.biome_id),
            ));
        }

        Ok(Self {
            noise,
            shaping,
            ores,
            trees,
            biomes,
            water_height: config.generator.water_height,
            spawn: IVec3::from_array(config.generator.spawn),
        })
    }
}

fn resolve_block(blocks: &BlockRegistry, name: &str) -> Result<BlockId, GeneratorError> {
    blocks
        .lookup_by_name(name)
        .ok_or_else(|| GeneratorError::UnknownBlock(name.to_string()))
}

fn resolve_biome(blocks: &BlockRegistry, biome: &BiomeConfig) -> Result<BiomeDef, GeneratorError> {
    let ground_cover = biome
        .ground_cover
        .iter()
        .map(|name| resolve_block(blocks, name))
        .collect::<Result<_, _>>()?;

    let decorations = biome
        .decorations
        .iter()
        .map(|decoration| match decoration {
            DecorationConfig::Scatter {
                block,
                on,
                base_amount,
                random_amount,
            } => Ok(Decoration::Scatter {
                block: resolve_block(blocks, block)?,
                on: resolve_block(blocks, on)?,
                base_amount: *base_amount,
                random_amount: *random_amount,
            }),
        })
        .collect::<Result<_, GeneratorError>>()?;

    Ok(BiomeDef {
        id: BiomeId(biome.id),
        name: biome.name.clone(),
        ground_cover,
        decorations,
    })
}
