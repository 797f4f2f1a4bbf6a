//! Block catalog: maps compact [`BlockId`] values to [`BlockDef`] metadata.
//!
//! The catalog is built once before the generator is constructed. Air is always
//! ID 0 so that a freshly allocated chunk represents empty sky.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The empty block. Always registered first.
    pub const AIR: Self = Self(0);

    /// Returns `true` for [`BlockId::AIR`].
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// How a block interacts with surface scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transparency {
    /// Terminates surface scans (stone, dirt, ores).
    Opaque,
    /// Seen through by surface scans (leaves, tall grass, air).
    Transparent,
}

/// Full descriptor for a block type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDef {
    /// Catalog name (e.g. "stone", "coal_ore").
    pub name: String,
    /// Whether the block occupies its cell. Non-solid ground-cover entries
    /// act as padding that clears the cell.
    pub solid: bool,
    /// Transparency mode.
    pub transparency: Transparency,
}

impl BlockDef {
    /// An opaque, solid block.
    pub fn opaque(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solid: true,
            transparency: Transparency::Opaque,
        }
    }

    /// A solid block that surface scans look through.
    pub fn transparent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solid: true,
            transparency: Transparency::Transparent,
        }
    }

    /// A non-solid, transparent block such as a plant.
    pub fn plant(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solid: false,
            transparency: Transparency::Transparent,
        }
    }
}

/// Errors that can occur during block registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// All 65 536 slots have been consumed.
    #[error("block registry is full (max 65536 types)")]
    RegistryFull,
}

/// Names registered by [`BlockRegistry::with_defaults`], in ID order after air.
const DEFAULT_OPAQUE: &[&str] = &[
    "stone",
    "grass",
    "dirt",
    "coal_ore",
    "iron_ore",
    "redstone_ore",
    "lapis_ore",
    "gold_ore",
    "diamond_ore",
    "granite",
    "diorite",
    "andesite",
    "gravel",
    "log",
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockId`] → [`BlockDef`] with O(1) lookup by index and O(1) reverse
/// lookup by name.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockId.0`.
    blocks: Vec<BlockDef>,
    /// Reverse lookup: name → ID.
    name_to_id: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates a new registry with air pre-registered as ID 0.
    pub fn new() -> Self {
        let air = BlockDef {
            name: "air".to_string(),
            solid: false,
            transparency: Transparency::Transparent,
        };

        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), BlockId::AIR);

        Self {
            blocks: vec![air],
            name_to_id,
        }
    }

    /// Creates a registry holding the standard sky-world catalog: rock, ground
    /// cover, ore variants, tree parts and tall grass.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defs = DEFAULT_OPAQUE
            .iter()
            .map(|name| BlockDef::opaque(name))
            .chain([BlockDef::transparent("leaves"), BlockDef::plant("tall_grass")]);
        for def in defs {
            // The default names are distinct and far below capacity.
            let _ = registry.register(def);
        }
        registry
    }

    /// Registers a new block and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a block with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all slots are
    /// consumed.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockId(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID, or `None` for IDs this registry
    /// never issued.
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    /// Returns the ID for a named block, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the total number of registered blocks (including air).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }

    /// Returns `true` if the block occupies its cell. Unknown IDs count as
    /// non-solid.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|def| def.solid)
    }

    /// Returns `true` if surface scans see through this block. Unknown IDs are
    /// treated like air.
    pub fn is_transparent(&self, id: BlockId) -> bool {
        match self.get(id) {
            Some(def) => def.transparency != Transparency::Opaque,
            None => true,
        }
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_id_zero() {
        let registry = BlockRegistry::new();
        let air = registry.get(BlockId::AIR).unwrap();
        assert_eq!(air.name, "air");
        assert!(!air.solid);
        assert!(registry.is_transparent(BlockId::AIR));
    }

    #[test]
    fn test_register_returns_sequential_ids() {
        let mut registry = BlockRegistry::new();
        let id1 = registry.register(BlockDef::opaque("stone")).unwrap();
        let id2 = registry.register(BlockDef::opaque("dirt")).unwrap();
        assert_eq!(id1, BlockId(1));
        assert_eq!(id2, BlockId(2));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register(BlockDef::opaque("stone")).unwrap();
        let result = registry.register(BlockDef::opaque("stone"));
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
    }

    #[test]
    fn test_defaults_cover_generator_blocks() {
        let registry = BlockRegistry::with_defaults();
        for name in ["stone", "grass", "dirt", "coal_ore", "diamond_ore", "gravel", "log"] {
            let id = registry.lookup_by_name(name);
            assert!(id.is_some(), "missing default block {name}");
            assert!(registry.is_solid(id.unwrap()));
            assert!(!registry.is_transparent(id.unwrap()));
        }
        let leaves = registry.lookup_by_name("leaves").unwrap();
        assert!(registry.is_solid(leaves));
        assert!(registry.is_transparent(leaves));
        let tall_grass = registry.lookup_by_name("tall_grass").unwrap();
        assert!(!registry.is_solid(tall_grass));
        assert_eq!(registry.len(), DEFAULT_OPAQUE.len() + 3);
    }

    #[test]
    fn test_unknown_id_is_non_solid_and_transparent() {
        let registry = BlockRegistry::new();
        assert!(registry.get(BlockId(999)).is_none());
        assert!(!registry.is_solid(BlockId(999)));
        assert!(registry.is_transparent(BlockId(999)));
    }
}
