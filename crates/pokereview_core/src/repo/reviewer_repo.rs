//! Reviewer repository contract and SQLite implementation.

use super::review_repo::{parse_review_row, REVIEW_COLUMNS};
use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::normalize_name;
use crate::model::review::Review;
use crate::model::reviewer::{Reviewer, ReviewerId};
use rusqlite::{params, Row};

const REVIEWER_SELECT_SQL: &str = "SELECT id, first_name, last_name FROM reviewers";

/// Repository interface for reviewers.
pub trait ReviewerRepository {
    fn exists(&self, id: ReviewerId) -> RepoResult<bool>;
    fn get_all(&self) -> RepoResult<Vec<Reviewer>>;
    fn get(&self, id: ReviewerId) -> RepoResult<Option<Reviewer>>;
    fn get_reviews_by_reviewer(&self, reviewer_id: ReviewerId) -> RepoResult<Vec<Review>>;
    /// First reviewer whose normalized last name equals `last_name`'s.
    fn find_by_normalized_name(&self, last_name: &str) -> RepoResult<Option<Reviewer>>;
    fn create(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome>;
    fn update(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome>;
    /// Rejected by storage while the reviewer still has reviews.
    fn delete(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed reviewer repository.
pub struct SqliteReviewerRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqliteReviewerRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl ReviewerRepository for SqliteReviewerRepository<'_> {
    fn exists(&self, id: ReviewerId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM reviewers WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Reviewer>> {
        query_list(
            self.ctx.connection(),
            &format!("{REVIEWER_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_reviewer_row,
        )
    }

    fn get(&self, id: ReviewerId) -> RepoResult<Option<Reviewer>> {
        query_first(
            self.ctx.connection(),
            &format!("{REVIEWER_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_reviewer_row,
        )
    }

    fn get_reviews_by_reviewer(&self, reviewer_id: ReviewerId) -> RepoResult<Vec<Review>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.reviewer_id = ?1 ORDER BY r.id ASC;"
            ),
            [reviewer_id],
            parse_review_row,
        )
    }

    fn find_by_normalized_name(&self, last_name: &str) -> RepoResult<Option<Reviewer>> {
        let wanted = normalize_name(last_name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|reviewer| normalize_name(&reviewer.last_name) == wanted))
    }

    fn create(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome> {
        reviewer.validate()?;
        self.ctx.stage(
            "INSERT INTO reviewers (first_name, last_name) VALUES (?1, ?2);",
            params![reviewer.first_name, reviewer.last_name],
        )?;
        commit_created(self.ctx, self.ctx.last_insert_id())
    }

    fn update(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome> {
        reviewer.validate()?;
        self.ctx.stage(
            "UPDATE reviewers SET first_name = ?1, last_name = ?2 WHERE id = ?3;",
            params![reviewer.first_name, reviewer.last_name, reviewer.id],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, reviewer: &Reviewer) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM reviewers WHERE id = ?1;", [reviewer.id])?;
        commit(self.ctx)
    }
}

fn parse_reviewer_row(row: &Row<'_>) -> rusqlite::Result<Reviewer> {
    Ok(Reviewer {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
