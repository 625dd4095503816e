//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - One repository per catalog entity, each owning existence checks,
//!   lookups, relation queries and single-entity mutations.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Every mutation stages its statements on the shared [`DataContext`] and
//!   commits once; the call succeeds iff the commit changed at least one row.
//! - Absence is reported as `Ok(None)` / `Ok(false)`, never as an error.
//! - Storage failures propagate as `RepoError::Db` and are never masked.
//! - Repositories do not enforce name uniqueness; they expose
//!   `find_by_normalized_name` for callers that do.
//!
//! [`DataContext`]: crate::db::DataContext

use crate::db::{CommitOutcome, DataContext, DbError};
use crate::model::ModelValidationError;
use rusqlite::{Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod country_repo;
pub mod owner_repo;
pub mod pokemon_repo;
pub mod review_repo;
pub mod reviewer_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entity failed field validation; nothing was staged.
    Validation(ModelValidationError),
    /// Storage engine failure, including constraint violations.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of one mutating repository call.
///
/// `rows_affected == 0` means nothing was persisted (for example updating or
/// deleting a row that no longer exists). Engine failures never reach this
/// type; they are returned as `RepoError::Db`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Rows changed by the commit that closed this call's unit of work.
    pub rows_affected: usize,
    /// Surrogate key assigned by a create call.
    pub created_id: Option<i64>,
}

impl MutationOutcome {
    /// Whether the commit persisted at least one row.
    pub fn succeeded(&self) -> bool {
        self.rows_affected > 0
    }
}

impl From<CommitOutcome> for MutationOutcome {
    fn from(value: CommitOutcome) -> Self {
        Self {
            rows_affected: value.rows_affected,
            created_id: None,
        }
    }
}

/// Commits the context and reports the outcome.
pub(crate) fn commit(ctx: &DataContext) -> RepoResult<MutationOutcome> {
    Ok(ctx.commit()?.into())
}

/// Commits the context and attaches the id assigned by the staged insert.
pub(crate) fn commit_created(ctx: &DataContext, created_id: i64) -> RepoResult<MutationOutcome> {
    let outcome = ctx.commit()?;
    Ok(MutationOutcome {
        rows_affected: outcome.rows_affected,
        created_id: Some(created_id),
    })
}

/// Runs an `EXISTS` style query returning 0 or 1.
pub(crate) fn query_exists<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(exists == 1)
}

/// Collects every row of a query through `parse`.
pub(crate) fn query_list<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

/// Returns the first row of a query, if any.
pub(crate) fn query_first<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}
