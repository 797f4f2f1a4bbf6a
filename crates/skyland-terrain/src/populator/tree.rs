//! Oak-style trees on grass and dirt.

use std::sync::Arc;

use rand::Rng;
use skyland_voxel::{BlockId, BlockRegistry, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord, ChunkSource};

use super::{Populator, amount};
use crate::error::GeneratorError;
use crate::seed::RandomStream;

/// Trunk columns keep this distance from the chunk edge so the canopy
/// (radius 2) never leaves the chunk.
pub const MARGIN: usize = 2;

/// Resolved tree settings.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSettings {
    pub base_amount: u32,
    pub random_amount: u32,
    pub log: BlockId,
    pub leaves: BlockId,
    /// Block placed under the trunk.
    pub soil: BlockId,
    /// Surface blocks a tree may grow on.
    pub workable: Vec<BlockId>,
}

impl TreeSettings {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.log.is_air() || self.leaves.is_air() || self.soil.is_air() {
            return Err(GeneratorError::invalid("trees", "tree blocks cannot be air"));
        }
        if self.workable.is_empty() {
            return Err(GeneratorError::invalid("trees", "workable block list is empty"));
        }
        Ok(())
    }
}

/// Plants trees on the highest workable block of random columns.
pub struct TreePlacer {
    settings: TreeSettings,
    blocks: Arc<BlockRegistry>,
}

impl TreePlacer {
    pub fn new(settings: TreeSettings, blocks: Arc<BlockRegistry>) -> Self {
        Self { settings, blocks }
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Plants up to `base + uniform[0, random]` trees. Returns how many grew.
    pub fn plant(&self, chunk: &mut Chunk, rng: &mut RandomStream) -> usize {
        let attempts = amount(rng, self.settings.base_amount, self.settings.random_amount);
        let mut planted = 0;
        for _ in 0..attempts {
            let x = rng.random_range(MARGIN..CHUNK_WIDTH - MARGIN);
            let z = rng.random_range(MARGIN..CHUNK_WIDTH - MARGIN);
            let Some(y) = self.highest_workable(chunk, x, z) else {
                continue;
            };
            if self.grow(chunk, x, y, z, rng) {
                planted += 1;
            }
        }
        planted
    }

    /// Height just above the surface when the first non-air block from the
    /// top is workable.
    fn highest_workable(&self, chunk: &Chunk, x: usize, z: usize) -> Option<usize> {
        let top = chunk.highest_matching(x, z, |b| !b.is_air())?;
        self.settings
            .workable
            .contains(&chunk.get(x, top, z))
            .then_some(top + 1)
    }

    fn overridable(&self, block: BlockId) -> bool {
        block.is_air()
            || block == self.settings.leaves
            || block == self.settings.log
            || !self.blocks.is_solid(block)
    }

    fn can_place(&self, chunk: &Chunk, x: usize, y: usize, z: usize, height: usize) -> bool {
        let mut radius = 0usize;
        for yy in 0..height + 3 {
            if yy == 1 || yy == height {
                radius += 1;
            }
            let cy = y + yy;
            if cy >= CHUNK_HEIGHT {
                return false;
            }
            for cx in x - radius..=x + radius {
                for cz in z - radius..=z + radius {
                    if !self.overridable(chunk.get(cx, cy, cz)) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn grow(&self, chunk: &mut Chunk, x: usize, y: usize, z: usize, rng: &mut RandomStream) -> bool {
        let height = 4 + rng.random_range(0..3usize);
        if y == 0 || !self.can_place(chunk, x, y, z, height) {
            return false;
        }

        let top = (y + height) as i32;
        for yy in top - 3..=top {
            let y_off = yy - top;
            let mid = (1.0 - f64::from(y_off) / 2.0) as i32;
            for xx in x as i32 - mid..=x as i32 + mid {
                let x_off = (xx - x as i32).abs();
                for zz in z as i32 - mid..=z as i32 + mid {
                    let z_off = (zz - z as i32).abs();
                    if x_off == mid && z_off == mid && (y_off == 0 || rng.random_range(0..2) == 0) {
                        continue;
                    }
                    let (lx, ly, lz) = (xx as usize, yy as usize, zz as usize);
                    if !self.blocks.is_solid(chunk.get(lx, ly, lz)) {
                        chunk.set(lx, ly, lz, self.settings.leaves);
                    }
                }
            }
        }

        chunk.set(x, y - 1, z, self.settings.soil);
        for yy in y..y + height - 1 {
            let block = chunk.get(x, yy, z);
            if block.is_air() || block == self.settings.leaves {
                chunk.set(x, yy, z, self.settings.log);
            }
        }
        true
    }
}

impl Populator for TreePlacer {
    fn name(&self) -> &'static str {
        "trees"
    }

    fn populate(&self, world: &mut dyn ChunkSource, coord: ChunkCoord, rng: &mut RandomStream) {
        let Some(chunk) = world.chunk_mut(coord) else {
            tracing::warn!(%coord, "tree placement skipped: chunk not loaded");
            return;
        };
        let planted = self.plant(chunk, rng);
        tracing::debug!(%coord, planted, "trees planted");
    }
}
