//! Pokemon entity and its many-to-many join rows.
//!
//! # Invariants
//! - A pokemon's categories and owners are defined only by join rows.
//! - Join rows are removed together with either side they link.

use super::category::CategoryId;
use super::owner::OwnerId;
use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type PokemonId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
}

impl Pokemon {
    /// Creates an unsaved pokemon.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("pokemon", "name", &self.name)
    }
}

/// Join row linking one pokemon to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonCategory {
    pub pokemon_id: PokemonId,
    pub category_id: CategoryId,
}

/// Join row linking one pokemon to one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonOwner {
    pub pokemon_id: PokemonId,
    pub owner_id: OwnerId,
}
