//! Catalog entity model.
//!
//! # Responsibility
//! - Define the six catalog entities and the two pokemon join rows.
//! - Provide field validation and the shared name normalization routine.
//!
//! # Invariants
//! - Every entity is identified by an `i64` surrogate key assigned by storage.
//! - `id == UNSAVED_ID` marks an entity that has not been persisted yet.
//! - Deletion removes rows; there are no tombstones.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod country;
pub mod owner;
pub mod pokemon;
pub mod review;
pub mod reviewer;

/// Surrogate key value of an entity that storage has not assigned yet.
pub const UNSAVED_ID: i64 = 0;

/// Field-level validation failure raised before any write is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty or whitespace only.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
    /// Review rating outside `RATING_MIN..=RATING_MAX`.
    RatingOutOfRange(i64),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity}.{field} must not be blank")
            }
            Self::RatingOutOfRange(rating) => write!(
                f,
                "review rating {rating} is outside {}..={}",
                review::RATING_MIN,
                review::RATING_MAX
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Normalizes a name or title for duplicate detection: trimmed and uppercased.
///
/// `"Water"` and `"water "` normalize to the same value. Uppercasing folds
/// `ß` to `SS`, so `"Straße"` matches `"STRASSE"`.
pub fn normalize_name(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Whether two names are equal under [`normalize_name`].
pub fn names_match(left: &str, right: &str) -> bool {
    normalize_name(left) == normalize_name(right)
}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField { entity, field });
    }
    Ok(())
}
