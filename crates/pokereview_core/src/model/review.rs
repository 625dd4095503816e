//! Review entity.
//!
//! # Invariants
//! - Every review references one existing pokemon and one existing reviewer.
//! - `rating` stays within `RATING_MIN..=RATING_MAX`.
//! - Duplicate detection keys on `title`.

use super::pokemon::PokemonId;
use super::reviewer::ReviewerId;
use super::{require_text, ModelValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

pub type ReviewId = i64;

/// Lowest accepted review rating.
pub const RATING_MIN: i64 = 1;
/// Highest accepted review rating.
pub const RATING_MAX: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub title: String,
    pub text: String,
    pub rating: i64,
    /// Reviewed pokemon.
    pub pokemon_id: PokemonId,
    /// Author.
    pub reviewer_id: ReviewerId,
}

impl Review {
    /// Creates an unsaved review of `pokemon_id` written by `reviewer_id`.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        rating: i64,
        pokemon_id: PokemonId,
        reviewer_id: ReviewerId,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            text: text.into(),
            rating,
            pokemon_id,
            reviewer_id,
        }
    }

    /// Checks text fields and rating bounds.
    ///
    /// Review body text may be empty; only the title is required.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("review", "title", &self.title)?;
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(ModelValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}
