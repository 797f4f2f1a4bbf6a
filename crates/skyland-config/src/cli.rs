//! Command-line argument parsing for the `skyland` driver.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Skyland command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "skyland", about = "Generate and populate a square of sky-island chunks")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chunks generated in each direction around the origin chunk.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Shaping worker threads (0 = derive from CPU count).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generator.world_seed = seed;
        }
        if let Some(radius) = args.radius {
            self.driver.radius = radius;
        }
        if let Some(threads) = args.threads {
            self.driver.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            radius: Some(5),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generator.world_seed, 42);
        assert_eq!(config.driver.radius, 5);
        // Non-overridden fields retain defaults
        assert_eq!(config.driver.threads, 0);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["skyland", "--seed", "7", "--log-level", "debug"]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
