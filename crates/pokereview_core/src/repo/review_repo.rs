//! Review repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create` relies on storage foreign keys: the referenced pokemon and
//!   reviewer must already exist.
//! - `delete_many` stages every removal into one unit of work; either all
//!   listed reviews are removed or none are. A listed review that is
//!   already gone aborts the batch with zero rows affected.

use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::normalize_name;
use crate::model::pokemon::PokemonId;
use crate::model::review::{Review, ReviewId};
use log::warn;
use rusqlite::{params, Row};

/// Review projection columns, aliased for queries against `reviews r`.
pub(crate) const REVIEW_COLUMNS: &str = "r.id AS id,
    r.title AS title,
    r.text AS text,
    r.rating AS rating,
    r.pokemon_id AS pokemon_id,
    r.reviewer_id AS reviewer_id";

/// Repository interface for reviews.
pub trait ReviewRepository {
    fn exists(&self, id: ReviewId) -> RepoResult<bool>;
    fn get_all(&self) -> RepoResult<Vec<Review>>;
    fn get(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn get_by_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Review>>;
    /// First review whose normalized title equals `title`'s.
    fn find_by_normalized_name(&self, title: &str) -> RepoResult<Option<Review>>;
    fn create(&self, review: &Review) -> RepoResult<MutationOutcome>;
    fn update(&self, review: &Review) -> RepoResult<MutationOutcome>;
    fn delete(&self, review: &Review) -> RepoResult<MutationOutcome>;
    /// Removes a batch of reviews with a single commit.
    ///
    /// Reports zero rows and removes nothing when any listed review is
    /// already gone.
    fn delete_many(&self, reviews: &[Review]) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqliteReviewRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn exists(&self, id: ReviewId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Review>> {
        query_list(
            self.ctx.connection(),
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews r ORDER BY r.id ASC;"),
            [],
            parse_review_row,
        )
    }

    fn get(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        query_first(
            self.ctx.connection(),
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = ?1;"),
            [id],
            parse_review_row,
        )
    }

    fn get_by_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Review>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.pokemon_id = ?1 ORDER BY r.id ASC;"
            ),
            [pokemon_id],
            parse_review_row,
        )
    }

    fn find_by_normalized_name(&self, title: &str) -> RepoResult<Option<Review>> {
        let wanted = normalize_name(title);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|review| normalize_name(&review.title) == wanted))
    }

    fn create(&self, review: &Review) -> RepoResult<MutationOutcome> {
        review.validate()?;
        self.ctx.stage(
            "INSERT INTO reviews (title, text, rating, pokemon_id, reviewer_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                review.title,
                review.text,
                review.rating,
                review.pokemon_id,
                review.reviewer_id
            ],
        )?;
        commit_created(self.ctx, self.ctx.last_insert_id())
    }

    fn update(&self, review: &Review) -> RepoResult<MutationOutcome> {
        review.validate()?;
        self.ctx.stage(
            "UPDATE reviews
             SET
                title = ?1,
                text = ?2,
                rating = ?3,
                pokemon_id = ?4,
                reviewer_id = ?5
             WHERE id = ?6;",
            params![
                review.title,
                review.text,
                review.rating,
                review.pokemon_id,
                review.reviewer_id,
                review.id
            ],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, review: &Review) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM reviews WHERE id = ?1;", [review.id])?;
        commit(self.ctx)
    }

    fn delete_many(&self, reviews: &[Review]) -> RepoResult<MutationOutcome> {
        for review in reviews {
            let removed = self
                .ctx
                .stage("DELETE FROM reviews WHERE id = ?1;", [review.id])?;
            if removed == 0 {
                warn!(
                    "event=review_delete_many module=repo status=error error_code=review_missing review_id={} batch_size={}",
                    review.id,
                    reviews.len()
                );
                self.ctx.rollback()?;
                return Ok(MutationOutcome {
                    rows_affected: 0,
                    created_id: None,
                });
            }
        }
        commit(self.ctx)
    }
}

pub(crate) fn parse_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        rating: row.get("rating")?,
        pokemon_id: row.get("pokemon_id")?,
        reviewer_id: row.get("reviewer_id")?,
    })
}
