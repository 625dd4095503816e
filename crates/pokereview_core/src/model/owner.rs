//! Owner entity.
//!
//! # Invariants
//! - `country_id` must reference a persisted country; storage rejects the
//!   write otherwise.
//! - Duplicate detection keys on `last_name`.

use super::country::CountryId;
use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type OwnerId = i64;

/// Pokemon owner. Linked to pokemon through `pokemon_owners` join rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    /// Country the owner belongs to.
    pub country_id: CountryId,
}

impl Owner {
    /// Creates an unsaved owner living in `country_id`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        country_id: CountryId,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            country_id,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("owner", "first_name", &self.first_name)?;
        require_text("owner", "last_name", &self.last_name)
    }
}
