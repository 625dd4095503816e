//! Country entity. Owners belong to exactly one country.

use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type CountryId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

impl Country {
    /// Creates an unsaved country.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("country", "name", &self.name)
    }
}
