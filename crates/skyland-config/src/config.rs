//! Configuration structs with generator defaults and RON persistence.
//!
//! Blocks are referenced by catalog name; the generator resolves and validates
//! every name when it is constructed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World-level settings.
    pub generator: GeneratorConfig,
    /// Noise field settings.
    pub noise: NoiseConfig,
    /// Island shaping constants.
    pub shaping: ShapingConfig,
    /// Ore table, seeded in order.
    pub ores: Vec<OreConfig>,
    /// Tree placement settings.
    pub trees: TreeConfig,
    /// Biome catalog.
    pub biomes: Vec<BiomeConfig>,
    /// Command-line driver settings.
    pub driver: DriverConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World seed. All generation derives from it.
    pub world_seed: u64,
    /// Water level reported to the host. Sky worlds have none.
    pub water_height: i32,
    /// Fixed spawn point `[x, y, z]`.
    pub spawn: [i32; 3],
}

/// Multi-octave noise settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of octaves summed.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Coordinate scale applied before sampling.
    pub expansion: f64,
    /// Lattice spacing `[x, y, z]` for fast sampling; cells between lattice
    /// points are interpolated.
    pub sampling: [usize; 3],
}

/// Constants of the two-band island shaping rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapingConfig {
    /// Height at which the vertical falloff is zero.
    pub empty_height: f64,
    /// Scale of the vertical falloff.
    pub empty_amplitude: f64,
    /// Fraction of the volume biased toward solid.
    pub density: f64,
    /// Island center `[x, y, z]` in world coordinates.
    pub island_center: [f64; 3],
    /// Divisor applied to `y` before measuring distance to the center.
    pub y_compression: f64,
    /// Radius of the dense core band.
    pub inner_radius: f64,
    /// Distance beyond which the outer shell band starts.
    pub outer_radius: f64,
    /// Density threshold of the outer shell band.
    pub outer_threshold: f64,
    /// Block placed in solid voxels.
    pub solid_block: String,
    /// Biome assigned to every column.
    pub biome_id: u8,
}

/// One row of the ore table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OreConfig {
    /// Ore block name.
    pub block: String,
    /// Cluster attempts per chunk.
    pub cluster_count: u32,
    /// Maximum blocks per cluster.
    pub cluster_size: u32,
    /// Lowest layer a cluster block may occupy.
    pub min_height: i32,
    /// Highest layer a cluster block may occupy.
    pub max_height: i32,
}

impl OreConfig {
    fn new(block: &str, cluster_count: u32, cluster_size: u32, min: i32, max: i32) -> Self {
        Self {
            block: block.to_string(),
            cluster_count,
            cluster_size,
            min_height: min,
            max_height: max,
        }
    }
}

/// Tree placement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    /// Trees attempted per chunk.
    pub base_amount: u32,
    /// Extra trees drawn uniformly from `0..=random_amount`.
    pub random_amount: u32,
    /// Trunk block.
    pub log_block: String,
    /// Canopy block.
    pub leaves_block: String,
    /// Block placed under the trunk.
    pub soil_block: String,
    /// Surface blocks a tree may grow on.
    pub workable: Vec<String>,
}

/// A biome and its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiomeConfig {
    /// Biome id written into chunk columns.
    pub id: u8,
    /// Biome name.
    pub name: String,
    /// Ground cover template, top first. Non-solid entries clear the cell.
    pub ground_cover: Vec<String>,
    /// Decorations run during population.
    #[serde(default)]
    pub decorations: Vec<DecorationConfig>,
}

/// A data-driven biome decoration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DecorationConfig {
    /// Place `block` on top of random columns whose surface is `on`.
    Scatter {
        /// Block to place.
        block: String,
        /// Required surface block.
        on: String,
        /// Attempts per chunk.
        base_amount: u32,
        /// Extra attempts drawn uniformly from `0..=random_amount`.
        random_amount: u32,
    },
}

/// Settings for the `skyland` command-line driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Chunks generated in each direction around the origin chunk.
    pub radius: u32,
    /// Shaping worker threads (0 = derive from CPU count).
    pub threads: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

/// Resolves the platform configuration directory for skyland.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the platform exposes none.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join("skyland"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            noise: NoiseConfig::default(),
            shaping: ShapingConfig::default(),
            ores: default_ores(),
            trees: TreeConfig::default(),
            biomes: vec![BiomeConfig::default()],
            driver: DriverConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

/// Classic sky-world ore table: six ores plus rock and soil pockets.
fn default_ores() -> Vec<OreConfig> {
    vec![
        OreConfig::new("coal_ore", 20, 16, 0, 128),
        OreConfig::new("iron_ore", 20, 8, 0, 64),
        OreConfig::new("redstone_ore", 8, 7, 0, 16),
        OreConfig::new("lapis_ore", 1, 6, 0, 32),
        OreConfig::new("gold_ore", 2, 8, 0, 32),
        OreConfig::new("diamond_ore", 1, 7, 0, 16),
        OreConfig::new("dirt", 20, 32, 0, 128),
        OreConfig::new("granite", 20, 32, 0, 128),
        OreConfig::new("diorite", 20, 32, 0, 128),
        OreConfig::new("andesite", 20, 32, 0, 128),
        OreConfig::new("gravel", 10, 16, 0, 128),
    ]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            world_seed: 0,
            water_height: 0,
            spawn: [0, 64, 64],
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.25,
            expansion: 1.0 / 64.0,
            sampling: [4, 8, 4],
        }
    }
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            empty_height: 32.0,
            empty_amplitude: 1.0,
            density: 0.6,
            island_center: [0.0, 64.0, 0.0],
            y_compression: 1.3,
            inner_radius: 100.0,
            outer_radius: 400.0,
            outer_threshold: -0.2,
            solid_block: "stone".to_string(),
            biome_id: 1,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            base_amount: 5,
            random_amount: 0,
            log_block: "log".to_string(),
            leaves_block: "leaves".to_string(),
            soil_block: "dirt".to_string(),
            workable: vec!["grass".to_string(), "dirt".to_string()],
        }
    }
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "sky".to_string(),
            ground_cover: ["grass", "dirt", "air", "air", "air"]
                .into_iter()
                .map(String::from)
                .collect(),
            decorations: vec![DecorationConfig::Scatter {
                block: "tall_grass".to_string(),
                on: "grass".to_string(),
                base_amount: 0,
                random_amount: 5,
            }],
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            threads: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new().depth_limit(4);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }
}
