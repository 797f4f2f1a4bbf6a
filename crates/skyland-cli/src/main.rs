//! `skyland`: generates and populates a square of sky-island chunks.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p skyland-cli -- --seed 42 --radius 3`.

use std::collections::BTreeSet;
use std::sync::Arc;

use clap::Parser;
use skyland_config::{CliArgs, Config, default_config_dir};
use skyland_terrain::{GeneratorError, ShapingPool, SkyGenerator};
use skyland_voxel::{BlockRegistry, ChunkCoord, ChunkManager, ChunkStatus};
use tracing::info;

/// Totals printed after a run.
#[derive(Debug, Default, PartialEq, Eq)]
struct WorldStats {
    chunks: usize,
    populated: usize,
    solid: usize,
    ores: usize,
    logs: usize,
    shaping_time_us: u64,
}

/// Every coordinate within `radius` chunks of the origin, row by row.
fn chunk_square(radius: u32) -> Vec<ChunkCoord> {
    let r = radius as i32;
    (-r..=r)
        .flat_map(|x| (-r..=r).map(move |z| ChunkCoord::new(x, z)))
        .collect()
}

/// Shapes `coords` on the pool and loads the results into `world`.
/// Returns the summed shaping time.
fn shape_all(pool: &ShapingPool, coords: &[ChunkCoord], world: &mut ChunkManager) -> Result<u64, GeneratorError> {
    let mut pending = coords.iter().copied();
    let mut next = pending.next();
    let mut total_us = 0;

    loop {
        while let Some(coord) = next {
            if pool.submit(coord).is_err() {
                break;
            }
            next = pending.next();
        }
        match pool.recv() {
            Some(shaped) => {
                total_us += shaped.generation_time_us;
                world.load_chunk(shaped.result?);
            }
            None if next.is_none() => break,
            None => {}
        }
    }
    Ok(total_us)
}

/// Populates every chunk whose eight neighbors are loaded.
fn populate_interior(generator: &SkyGenerator, world: &mut ChunkManager) -> Result<usize, GeneratorError> {
    let interior: BTreeSet<ChunkCoord> = world
        .loaded_coords()
        .copied()
        .filter(|&coord| world.has_all_neighbors(coord))
        .collect();
    for &coord in &interior {
        generator.populate_chunk(world, coord)?;
    }
    Ok(interior.len())
}

fn collect_stats(generator: &SkyGenerator, world: &ChunkManager) -> WorldStats {
    let log = generator.settings().trees.log;
    let ore_blocks: Vec<_> = generator
        .settings()
        .ores
        .iter()
        .filter(|ore| ore.name.ends_with("_ore"))
        .map(|ore| ore.block)
        .collect();

    let mut stats = WorldStats::default();
    for (_, chunk) in world.iter() {
        stats.chunks += 1;
        if chunk.status() == ChunkStatus::Populated {
            stats.populated += 1;
        }
        stats.solid += chunk.count_non_air();
        stats.ores += ore_blocks.iter().map(|&b| chunk.count(b)).sum::<usize>();
        stats.logs += chunk.count(log);
    }
    stats
}

fn run(config: &Config) -> Result<WorldStats, GeneratorError> {
    let seed = config.generator.world_seed;
    let generator = Arc::new(SkyGenerator::new(seed, config, BlockRegistry::with_defaults())?);
    let coords = chunk_square(config.driver.radius);

    let pool = ShapingPool::new(Arc::clone(&generator), config.driver.threads, 64, 128);
    info!(
        seed,
        chunks = coords.len(),
        threads = pool.thread_count(),
        "shaping chunks"
    );

    let mut world = ChunkManager::new(seed);
    let shaping_time_us = shape_all(&pool, &coords, &mut world)?;
    drop(pool);

    let populated = populate_interior(&generator, &mut world)?;
    info!(populated, "population finished");

    let mut stats = collect_stats(&generator, &world);
    stats.shaping_time_us = shaping_time_us;
    Ok(stats)
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            std::process::exit(1);
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Err(e) = skyland_log::init_logging(Some(&log_dir), Some(&config)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let spawn = config.generator.spawn;
    match run(&config) {
        Ok(stats) => {
            println!("world seed:      {}", config.generator.world_seed);
            println!("chunks shaped:   {}", stats.chunks);
            println!("chunks populated: {}", stats.populated);
            println!("solid blocks:    {}", stats.solid);
            println!("ore blocks:      {}", stats.ores);
            println!("log blocks:      {}", stats.logs);
            println!("shaping time:    {} ms", stats.shaping_time_us / 1000);
            println!("spawn:           ({}, {}, {})", spawn[0], spawn[1], spawn[2]);
        }
        Err(e) => {
            eprintln!("Generation failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_square_size() {
        assert_eq!(chunk_square(0), vec![ChunkCoord::new(0, 0)]);
        assert_eq!(chunk_square(2).len(), 25);
        assert!(chunk_square(1).contains(&ChunkCoord::new(-1, 1)));
    }

    #[test]
    fn test_run_populates_only_interior() {
        let mut config = Config::default();
        config.generator.world_seed = 12;
        config.driver.radius = 1;
        config.driver.threads = 2;

        let stats = run(&config).unwrap();
        assert_eq!(stats.chunks, 9);
        assert_eq!(stats.populated, 1, "only the origin has all eight neighbors");
        assert!(stats.solid > 0, "the island core lies around the origin");
    }

    #[test]
    fn test_run_is_deterministic() {
        let mut config = Config::default();
        config.driver.radius = 1;
        config.driver.threads = 3;
        let mut a = run(&config).unwrap();
        let mut b = run(&config).unwrap();
        a.shaping_time_us = 0;
        b.shaping_time_us = 0;
        assert_eq!(a, b);
    }
}
