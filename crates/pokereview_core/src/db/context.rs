//! Shared unit-of-work context over one catalog connection.
//!
//! # Responsibility
//! - Hold the single connection all repositories of one logical operation use.
//! - Stage write statements into one open unit of work and apply them with
//!   a single `commit`.
//!
//! # Invariants
//! - A unit is opened lazily by the first staged write (`BEGIN IMMEDIATE`).
//! - Staged writes are visible to reads through the same context before commit.
//! - Any staging or commit failure rolls back the whole unit; no partial unit
//!   is ever persisted.
//! - A context dropped with an open unit rolls it back.
//! - The context is not `Sync`; one instance serves one operation at a time.

use super::migrations::{current_user_version, latest_version, REQUIRED_TABLES};
use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{debug, error, info, warn};
use rusqlite::{Connection, Params};
use std::cell::Cell;
use std::path::Path;

/// Result of applying one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Sum of rows changed by every statement staged in the unit.
    pub rows_affected: usize,
}

/// Unit-of-work handle shared by all repositories of one operation.
pub struct DataContext {
    conn: Connection,
    unit_open: Cell<bool>,
    staged_rows: Cell<usize>,
}

impl DataContext {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest one.
    /// - `MissingRequiredTable` when any catalog table is absent.
    pub fn try_new(conn: Connection) -> DbResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn,
            unit_open: Cell::new(false),
            staged_rows: Cell::new(0),
        })
    }

    /// Opens a store file and wraps it in a fresh context.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory store and wraps it in a fresh context.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Read access for repository queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether a unit of work is currently open.
    pub fn has_pending_unit(&self) -> bool {
        self.unit_open.get()
    }

    /// Rows changed so far by statements staged in the open unit.
    pub fn staged_rows(&self) -> usize {
        self.staged_rows.get()
    }

    /// Executes one write statement inside the open unit of work.
    ///
    /// Returns the rows changed by this statement. On failure the whole unit
    /// is rolled back before the error is returned.
    pub fn stage<P: Params>(&self, sql: &str, params: P) -> DbResult<usize> {
        if !self.unit_open.get() {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
            self.unit_open.set(true);
            self.staged_rows.set(0);
        }

        match self.conn.execute(sql, params) {
            Ok(changed) => {
                self.staged_rows.set(self.staged_rows.get() + changed);
                Ok(changed)
            }
            Err(err) => {
                warn!(
                    "event=uow_stage module=db status=error error_code=stage_failed error={}",
                    err
                );
                self.discard_unit();
                Err(err.into())
            }
        }
    }

    /// Surrogate key assigned by the most recent staged insert.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Applies the open unit atomically.
    ///
    /// Committing with nothing staged is not an error and reports zero rows.
    pub fn commit(&self) -> DbResult<CommitOutcome> {
        if !self.unit_open.get() {
            debug!("event=uow_commit module=db status=ok rows_affected=0 empty=true");
            return Ok(CommitOutcome { rows_affected: 0 });
        }

        let rows_affected = self.staged_rows.get();
        if let Err(err) = self.conn.execute_batch("COMMIT;") {
            error!(
                "event=uow_commit module=db status=error error_code=commit_failed rows_staged={} error={}",
                rows_affected, err
            );
            self.discard_unit();
            return Err(err.into());
        }

        self.unit_open.set(false);
        self.staged_rows.set(0);
        debug!("event=uow_commit module=db status=ok rows_affected={rows_affected}");
        Ok(CommitOutcome { rows_affected })
    }

    /// Discards every statement staged in the open unit.
    pub fn rollback(&self) -> DbResult<()> {
        let discarded_rows = self.staged_rows.replace(0);
        let was_open = self.unit_open.replace(false);
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK;")?;
        }
        if was_open {
            info!("event=uow_rollback module=db status=ok discarded_rows={discarded_rows}");
        }
        Ok(())
    }

    fn discard_unit(&self) {
        if let Err(err) = self.rollback() {
            error!(
                "event=uow_rollback module=db status=error error_code=rollback_failed error={}",
                err
            );
        }
    }
}

impl Drop for DataContext {
    fn drop(&mut self) {
        if self.unit_open.get() {
            warn!(
                "event=uow_drop module=db status=error error_code=uncommitted_unit staged_rows={}",
                self.staged_rows.get()
            );
            self.discard_unit();
        }
    }
}

fn ensure_connection_ready(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
