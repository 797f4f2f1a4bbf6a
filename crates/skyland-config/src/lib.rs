//! Configuration for the sky-island generator.
//!
//! Every content table the generator uses (ores, ground cover, biome
//! decoration, shaping constants) lives here as data and persists to disk as a
//! RON file. Supports CLI overrides via clap and hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BiomeConfig, Config, DebugConfig, DecorationConfig, DriverConfig, GeneratorConfig,
    NoiseConfig, OreConfig, ShapingConfig, TreeConfig, default_config_dir,
};
pub use error::ConfigError;
