//! Reviewer entity.

use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type ReviewerId = i64;

/// Author of reviews. Duplicate detection keys on `last_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: ReviewerId,
    pub first_name: String,
    pub last_name: String,
}

impl Reviewer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("reviewer", "first_name", &self.first_name)?;
        require_text("reviewer", "last_name", &self.last_name)
    }
}
