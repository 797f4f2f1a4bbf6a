//! Ore and rock-pocket clusters seeded into host rock.
//!
//! Each cluster is a random walk over the 6-neighborhood starting at a random
//! column and a height drawn from the specification's range. Clusters never
//! leave the chunk being populated, so a chunk's ores depend on nothing but
//! its own stream.

use rand::Rng;
use skyland_voxel::{BlockId, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord, ChunkSource, PlacementSkipped};

use super::Populator;
use crate::error::GeneratorError;
use crate::seed::RandomStream;

const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// One resolved row of the ore table.
#[derive(Clone, Debug, PartialEq)]
pub struct OreSpecification {
    /// Name used in errors and logs.
    pub name: String,
    pub block: BlockId,
    /// Cluster attempts per chunk.
    pub cluster_count: u32,
    /// Maximum blocks per cluster.
    pub cluster_size: u32,
    pub min_height: i32,
    /// Inclusive. May equal the chunk height; cells at that height are never
    /// placed.
    pub max_height: i32,
}

impl OreSpecification {
    /// Checks the height range and counts.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::InvalidSpecification`] when the range falls outside
    /// `[0, CHUNK_HEIGHT]`, is inverted, or a count is zero.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.min_height < 0 || self.max_height > CHUNK_HEIGHT as i32 {
            return Err(GeneratorError::invalid(
                &self.name,
                format!(
                    "height range [{}, {}] exceeds chunk bounds [0, {CHUNK_HEIGHT}]",
                    self.min_height, self.max_height
                ),
            ));
        }
        if self.min_height > self.max_height {
            return Err(GeneratorError::invalid(
                &self.name,
                format!("min_height {} > max_height {}", self.min_height, self.max_height),
            ));
        }
        if self.cluster_count == 0 || self.cluster_size == 0 {
            return Err(GeneratorError::invalid(
                &self.name,
                "cluster_count and cluster_size must be non-zero",
            ));
        }
        if self.block.is_air() {
            return Err(GeneratorError::invalid(&self.name, "ore block cannot be air"));
        }
        Ok(())
    }

    fn allows_height(&self, y: i32) -> bool {
        (self.min_height..=self.max_height).contains(&y) && y < CHUNK_HEIGHT as i32
    }
}

/// Outcome counters of one ore pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OreReport {
    pub clusters_attempted: u32,
    pub placed: u32,
    pub skipped: u32,
}

/// Seeds every ore specification, in table order, into host rock.
pub struct OreSeeder {
    ores: Vec<OreSpecification>,
    host: BlockId,
}

impl OreSeeder {
    /// Creates a seeder replacing only `host` blocks.
    pub fn new(ores: Vec<OreSpecification>, host: BlockId) -> Self {
        Self { ores, host }
    }

    pub fn ores(&self) -> &[OreSpecification] {
        &self.ores
    }

    /// Runs every specification against `chunk`.
    pub fn seed_ores(&self, chunk: &mut Chunk, rng: &mut RandomStream) -> OreReport {
        let mut report = OreReport::default();
        for ore in &self.ores {
            for _ in 0..ore.cluster_count {
                report.clusters_attempted += 1;
                self.seed_cluster(chunk, ore, rng, &mut report);
            }
        }
        report
    }

    fn seed_cluster(&self, chunk: &mut Chunk, ore: &OreSpecification, rng: &mut RandomStream, report: &mut OreReport) {
        let mut x = rng.random_range(0..CHUNK_WIDTH as i32);
        let mut z = rng.random_range(0..CHUNK_WIDTH as i32);
        let mut y = rng.random_range(ore.min_height..=ore.max_height);

        for step in 0..ore.cluster_size {
            match self.place(chunk, ore, x, y, z) {
                Ok(()) => report.placed += 1,
                Err(reason) => {
                    report.skipped += 1;
                    tracing::trace!(ore = %ore.name, x, y, z, %reason, "ore placement skipped");
                }
            }
            if step + 1 < ore.cluster_size {
                let (dx, dy, dz) = NEIGHBORS[rng.random_range(0..NEIGHBORS.len())];
                x += dx;
                y += dy;
                z += dz;
            }
        }
    }

    fn place(&self, chunk: &mut Chunk, ore: &OreSpecification, x: i32, y: i32, z: i32) -> Result<(), PlacementSkipped> {
        let width = 0..CHUNK_WIDTH as i32;
        if !width.contains(&x) || !width.contains(&z) || !ore.allows_height(y) {
            return Err(PlacementSkipped::OutOfRange);
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if chunk.get(x, y, z) != self.host {
            return Err(PlacementSkipped::Occupied);
        }
        chunk.set(x, y, z, ore.block);
        Ok(())
    }
}

impl Populator for OreSeeder {
    fn name(&self) -> &'static str {
        "ores"
    }

    fn populate(&self, world: &mut dyn ChunkSource, coord: ChunkCoord, rng: &mut RandomStream) {
        let Some(chunk) = world.chunk_mut(coord) else {
            tracing::warn!(%coord, "ore seeding skipped: chunk not loaded");
            return;
        };
        let report = self.seed_ores(chunk, rng);
        tracing::debug!(
            %coord,
            clusters = report.clusters_attempted,
            placed = report.placed,
            skipped = report.skipped,
            "ores seeded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Phase, SeedScheduler};

    const STONE: BlockId = BlockId(1);
    const COAL: BlockId = BlockId(4);

    fn spec(min: i32, max: i32) -> OreSpecification {
        OreSpecification {
            name: "coal_ore".to_string(),
            block: COAL,
            cluster_count: 20,
            cluster_size: 16,
            min_height: min,
            max_height: max,
        }
    }

    fn solid_chunk(coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                for y in 0..CHUNK_HEIGHT {
                    chunk.set(x, y, z, STONE);
                }
            }
        }
        chunk
    }

    fn stream(coord: ChunkCoord) -> RandomStream {
        SeedScheduler::new(42).stream(coord, Phase::Population)
    }

    #[test]
    fn test_validate_table_bounds() {
        assert!(spec(0, 128).validate().is_ok(), "max may equal the chunk height");
        assert!(spec(0, 129).validate().is_err());
        assert!(spec(-1, 16).validate().is_err());
        assert!(spec(40, 20).validate().is_err());

        let mut zero = spec(0, 16);
        zero.cluster_count = 0;
        assert!(matches!(
            zero.validate(),
            Err(GeneratorError::InvalidSpecification { name, .. }) if name == "coal_ore"
        ));
    }

    #[test]
    fn test_placed_ores_respect_height_range() {
        let coord = ChunkCoord::new(3, -2);
        let mut chunk = solid_chunk(coord);
        let seeder = OreSeeder::new(vec![spec(10, 20)], STONE);

        let report = seeder.seed_ores(&mut chunk, &mut stream(coord));
        assert!(report.placed > 0, "a solid chunk should accept some ore");
        for ((x, y, z), block) in chunk.iter() {
            if block == COAL {
                assert!((10..=20).contains(&y), "ore at ({x}, {y}, {z}) outside [10, 20]");
            }
        }
    }

    #[test]
    fn test_cluster_attempts_bounded_by_count() {
        let coord = ChunkCoord::new(0, 0);
        let mut chunk = solid_chunk(coord);
        let seeder = OreSeeder::new(vec![spec(0, 128), spec(0, 16)], STONE);

        let report = seeder.seed_ores(&mut chunk, &mut stream(coord));
        assert_eq!(report.clusters_attempted, 40);
        assert_eq!(report.placed + report.skipped, 40 * 16);
        assert!(chunk.count(COAL) as u32 <= report.placed);
    }

    #[test]
    fn test_ore_only_replaces_host() {
        let coord = ChunkCoord::new(0, 0);
        let mut chunk = Chunk::new(coord);
        let seeder = OreSeeder::new(vec![spec(0, 128)], STONE);

        let report = seeder.seed_ores(&mut chunk, &mut stream(coord));
        assert_eq!(report.placed, 0, "air is never replaced");
        assert_eq!(chunk.count_non_air(), 0);
    }

    #[test]
    fn test_same_stream_same_ores() {
        let coord = ChunkCoord::new(5, 5);
        let seeder = OreSeeder::new(vec![spec(0, 64)], STONE);
        let mut a = solid_chunk(coord);
        let mut b = solid_chunk(coord);
        seeder.seed_ores(&mut a, &mut stream(coord));
        seeder.seed_ores(&mut b, &mut stream(coord));
        assert_eq!(a, b);
    }
}
