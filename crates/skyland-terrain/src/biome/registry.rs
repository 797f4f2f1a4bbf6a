//! Biome registry: maps [`BiomeId`] to [`BiomeDef`] with name-based lookup.

use hashbrown::HashMap;
use skyland_voxel::BiomeId;

use super::BiomeDef;

/// Errors that can occur when registering biomes.
#[derive(Debug, thiserror::Error)]
pub enum BiomeRegistryError {
    /// A biome with this name is already registered.
    #[error("duplicate biome name: {0}")]
    DuplicateName(String),
    /// A biome with this id is already registered.
    #[error("duplicate biome id: {0}")]
    DuplicateId(u8),
}

/// Stores all registered biome definitions, keyed by the id chunks carry.
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: HashMap<BiomeId, BiomeDef>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a biome under its own id.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateId`] or
    /// [`BiomeRegistryError::DuplicateName`] if either is taken.
    pub fn register(&mut self, def: BiomeDef) -> Result<BiomeId, BiomeRegistryError> {
        if self.biomes.contains_key(&def.id) {
            return Err(BiomeRegistryError::DuplicateId(def.id.0));
        }
        if self.name_to_id.contains_key(&def.name) {
            return Err(BiomeRegistryError::DuplicateName(def.name.clone()));
        }
        let id = def.id;
        self.name_to_id.insert(def.name.clone(), id);
        self.biomes.insert(id, def);
        Ok(id)
    }

    /// Returns the definition for the given biome id, if registered.
    pub fn get(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biomes.get(&id)
    }

    /// Looks up a biome id by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}
