//! Country repository contract and SQLite implementation.
//!
//! # Invariants
//! - A country that still has owners cannot be deleted; storage rejects the
//!   statement and the error propagates.

use super::owner_repo::{parse_owner_row, OWNER_COLUMNS};
use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::country::{Country, CountryId};
use crate::model::normalize_name;
use crate::model::owner::{Owner, OwnerId};
use rusqlite::{params, Row};

const COUNTRY_SELECT_SQL: &str = "SELECT id, name FROM countries";

/// Repository interface for countries.
pub trait CountryRepository {
    fn exists(&self, id: CountryId) -> RepoResult<bool>;
    fn get_all(&self) -> RepoResult<Vec<Country>>;
    fn get(&self, id: CountryId) -> RepoResult<Option<Country>>;
    /// Country the owner belongs to, absent when the owner does not exist.
    fn get_by_owner(&self, owner_id: OwnerId) -> RepoResult<Option<Country>>;
    fn get_owners_of_country(&self, country_id: CountryId) -> RepoResult<Vec<Owner>>;
    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Country>>;
    fn create(&self, country: &Country) -> RepoResult<MutationOutcome>;
    fn update(&self, country: &Country) -> RepoResult<MutationOutcome>;
    fn delete(&self, country: &Country) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed country repository.
pub struct SqliteCountryRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqliteCountryRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl CountryRepository for SqliteCountryRepository<'_> {
    fn exists(&self, id: CountryId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM countries WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Country>> {
        query_list(
            self.ctx.connection(),
            &format!("{COUNTRY_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_country_row,
        )
    }

    fn get(&self, id: CountryId) -> RepoResult<Option<Country>> {
        query_first(
            self.ctx.connection(),
            &format!("{COUNTRY_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_country_row,
        )
    }

    fn get_by_owner(&self, owner_id: OwnerId) -> RepoResult<Option<Country>> {
        query_first(
            self.ctx.connection(),
            "SELECT c.id AS id, c.name AS name
             FROM owners o
             INNER JOIN countries c ON c.id = o.country_id
             WHERE o.id = ?1;",
            [owner_id],
            parse_country_row,
        )
    }

    fn get_owners_of_country(&self, country_id: CountryId) -> RepoResult<Vec<Owner>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {OWNER_COLUMNS} FROM owners o WHERE o.country_id = ?1 ORDER BY o.id ASC;"
            ),
            [country_id],
            parse_owner_row,
        )
    }

    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Country>> {
        let wanted = normalize_name(name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|country| normalize_name(&country.name) == wanted))
    }

    fn create(&self, country: &Country) -> RepoResult<MutationOutcome> {
        country.validate()?;
        self.ctx.stage(
            "INSERT INTO countries (name) VALUES (?1);",
            params![country.name],
        )?;
        commit_created(self.ctx, self.ctx.last_insert_id())
    }

    fn update(&self, country: &Country) -> RepoResult<MutationOutcome> {
        country.validate()?;
        self.ctx.stage(
            "UPDATE countries SET name = ?1 WHERE id = ?2;",
            params![country.name, country.id],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, country: &Country) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM countries WHERE id = ?1;", [country.id])?;
        commit(self.ctx)
    }
}

fn parse_country_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
