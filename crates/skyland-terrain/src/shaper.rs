//! Two-band floating-island shaping.
//!
//! A voxel is solid when the vertically biased noise density is negative and
//! the voxel lies inside the inner core radius, or when the density drops
//! below the outer threshold beyond the outer radius. Nothing is placed in the
//! band between the two radii.

use glam::DVec3;
use skyland_voxel::{BiomeId, BlockId, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord};

use crate::error::GeneratorError;
use crate::noise_field::{NoiseField, NoiseSample};

/// Size of the noise box sampled for one chunk, `[width, height, depth]`.
pub const CHUNK_BOX: [usize; 3] = [CHUNK_WIDTH, CHUNK_HEIGHT, CHUNK_WIDTH];

/// Constants of the shaping rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapingParams {
    /// Height at which the vertical falloff is zero.
    pub empty_height: f64,
    /// Scale of the vertical falloff.
    pub empty_amplitude: f64,
    /// Fraction of the volume biased toward solid.
    pub density: f64,
    /// Island center in world coordinates.
    pub island_center: DVec3,
    /// Divisor applied to `y` before measuring distance to the center.
    pub y_compression: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Density a voxel must drop below to be solid in the outer band.
    pub outer_threshold: f64,
    /// Block written into solid voxels.
    pub solid_block: BlockId,
    /// Biome assigned to every column.
    pub biome: BiomeId,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            empty_height: 32.0,
            empty_amplitude: 1.0,
            density: 0.6,
            island_center: DVec3::new(0.0, 64.0, 0.0),
            y_compression: 1.3,
            inner_radius: 100.0,
            outer_radius: 400.0,
            outer_threshold: -0.2,
            solid_block: BlockId(1),
            biome: BiomeId(1),
        }
    }
}

impl ShapingParams {
    /// Rejects values that would divide by zero or make the bands overlap.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(self.empty_height > 0.0) {
            return Err(GeneratorError::invalid("shaping", "empty_height must be positive"));
        }
        if !(self.y_compression > 0.0) {
            return Err(GeneratorError::invalid("shaping", "y_compression must be positive"));
        }
        if !(0.0..=self.outer_radius).contains(&self.inner_radius) {
            return Err(GeneratorError::invalid(
                "shaping",
                format!(
                    "inner_radius {} must lie in [0, outer_radius {}]",
                    self.inner_radius, self.outer_radius
                ),
            ));
        }
        if self.solid_block.is_air() {
            return Err(GeneratorError::invalid("shaping", "solid_block cannot be air"));
        }
        Ok(())
    }
}

/// Density before the radial test: `|h - y| / h * amplitude - noise - (1 - density)`.
pub fn base_density(y: f64, noise: f64, params: &ShapingParams) -> f64 {
    let h = params.empty_height;
    let base = (h - y).abs() / h * params.empty_amplitude - noise;
    base - (1.0 - params.density)
}

/// Distance from the island center to `(wx, y / y_compression, wz)`.
pub fn island_distance(wx: f64, y: f64, wz: f64, params: &ShapingParams) -> f64 {
    let offset = DVec3::new(wx, y / params.y_compression, wz) - params.island_center;
    libm::sqrt(offset.dot(offset))
}

/// The two-band decision rule.
pub fn is_solid(base: f64, distance: f64, params: &ShapingParams) -> bool {
    (base < 0.0 && distance < params.inner_radius)
        || (base < params.outer_threshold && distance > params.outer_radius)
}

/// Fills a chunk with solid terrain from the noise field.
pub struct TerrainShaper {
    noise: NoiseField,
    params: ShapingParams,
}

impl TerrainShaper {
    pub fn new(noise: NoiseField, params: ShapingParams) -> Self {
        Self { noise, params }
    }

    pub fn params(&self) -> &ShapingParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Samples the chunk's noise box and shapes it. Returns the number of
    /// solid voxels written.
    pub fn shape(&self, coord: ChunkCoord, chunk: &mut Chunk) -> usize {
        let (ox, oz) = coord.world_origin();
        let sample = self
            .noise
            .sample_box(CHUNK_BOX, [ox as f64, 0.0, oz as f64]);
        self.shape_with_noise(coord, chunk, &sample)
    }

    /// Shapes a chunk from a precomputed noise sample. Solid voxels receive the
    /// solid block; all other voxels are left untouched. Every column gets the
    /// configured biome.
    pub fn shape_with_noise(&self, coord: ChunkCoord, chunk: &mut Chunk, noise: &NoiseSample) -> usize {
        let (ox, oz) = coord.world_origin();
        let mut solid = 0;

        for x in 0..CHUNK_WIDTH {
            let wx = (ox + x as i64) as f64;
            for z in 0..CHUNK_WIDTH {
                let wz = (oz + z as i64) as f64;
                chunk.set_biome(x, z, self.params.biome);

                for y in 0..CHUNK_HEIGHT {
                    let base = base_density(y as f64, noise.get(x, z, y), &self.params);
                    let distance = island_distance(wx, y as f64, wz, &self.params);
                    if is_solid(base, distance, &self.params) {
                        chunk.set(x, y, z, self.params.solid_block);
                        solid += 1;
                    }
                }
            }
        }

        solid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::NoiseParams;

    fn shaper() -> TerrainShaper {
        TerrainShaper::new(
            NoiseField::new(0, NoiseParams::default()),
            ShapingParams::default(),
        )
    }

    fn zero_noise() -> NoiseSample {
        NoiseSample::uniform(CHUNK_BOX, 0.0)
    }

    /// Solid heights of column `(x, z)`.
    fn solid_heights(chunk: &Chunk, x: usize, z: usize) -> Vec<usize> {
        (0..CHUNK_HEIGHT)
            .filter(|&y| !chunk.get(x, y, z).is_air())
            .collect()
    }

    #[test]
    fn test_worked_example_core_solid() {
        let params = ShapingParams::default();
        let base = base_density(32.0, 0.0, &params);
        assert!((base - -0.4).abs() < 1e-12, "base should be -0.4, got {base}");
        assert!(is_solid(base, 0.0, &params));
    }

    #[test]
    fn test_outer_band_threshold() {
        let params = ShapingParams::default();
        assert!(is_solid(-0.3, 500.0, &params), "-0.3 < -0.2 beyond outer radius");
        assert!(!is_solid(-0.1, 500.0, &params), "-0.1 is not below -0.2");
    }

    #[test]
    fn test_gap_between_bands_is_empty() {
        let params = ShapingParams::default();
        assert!(!is_solid(-5.0, 250.0, &params));
        assert!(!is_solid(-5.0, 100.0, &params), "inner bound is exclusive");
        assert!(!is_solid(-5.0, 400.0, &params), "outer bound is exclusive");
    }

    #[test]
    fn test_distance_compresses_y() {
        let params = ShapingParams::default();
        let d = island_distance(0.0, 64.0 * 1.3, 0.0, &params);
        assert!(d.abs() < 1e-9, "compressed y of 83.2 should sit on the center");
        let d = island_distance(3.0, 83.2, 4.0, &params);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_inner_chunk_with_zero_noise() {
        let shaper = shaper();
        let coord = ChunkCoord::new(0, 0);
        let mut chunk = Chunk::new(coord);
        let solid = shaper.shape_with_noise(coord, &mut chunk, &zero_noise());

        let expected: Vec<usize> = (20..=44).collect();
        for x in [0, 7, 15] {
            for z in [0, 8, 15] {
                assert_eq!(solid_heights(&chunk, x, z), expected, "column ({x}, {z})");
            }
        }
        assert_eq!(solid, 25 * 256);
        assert_eq!(chunk.get(0, 30, 0), BlockId(1));
    }

    #[test]
    fn test_outer_chunk_with_zero_noise() {
        let shaper = shaper();
        let coord = ChunkCoord::new(30, 0);
        let mut chunk = Chunk::new(coord);
        shaper.shape_with_noise(coord, &mut chunk, &zero_noise());

        let expected: Vec<usize> = (26..=38).collect();
        assert_eq!(solid_heights(&chunk, 4, 9), expected);
    }

    #[test]
    fn test_gap_chunk_stays_air() {
        let shaper = shaper();
        let coord = ChunkCoord::new(15, 0);
        let mut chunk = Chunk::new(coord);
        let solid = shaper.shape_with_noise(coord, &mut chunk, &zero_noise());
        assert_eq!(solid, 0);
        assert_eq!(chunk.count_non_air(), 0);
    }

    #[test]
    fn test_every_column_gets_biome() {
        let shaper = shaper();
        let coord = ChunkCoord::new(15, 0);
        let mut chunk = Chunk::new(coord);
        shaper.shape_with_noise(coord, &mut chunk, &zero_noise());
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                assert_eq!(chunk.biome(x, z), BiomeId(1));
            }
        }
    }

    #[test]
    fn test_shape_is_deterministic() {
        let shaper = shaper();
        let coord = ChunkCoord::new(-1, 2);
        let mut a = Chunk::new(coord);
        let mut b = Chunk::new(coord);
        shaper.shape(coord, &mut a);
        shaper.shape(coord, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_rejects_air_solid_block() {
        let params = ShapingParams {
            solid_block: BlockId::AIR,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(ShapingParams::default().validate().is_ok());
    }
}
