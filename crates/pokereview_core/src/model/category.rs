//! Pokemon category (type) entity.

use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// Grouping linked to pokemon through `pokemon_categories` join rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Creates an unsaved category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("category", "name", &self.name)
    }
}
