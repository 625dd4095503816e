//! Owner repository contract and SQLite implementation.
//!
//! # Invariants
//! - Owner/pokemon links live in `pokemon_owners` and are removed with the
//!   owner.
//! - Duplicate lookups compare normalized last names.

use super::pokemon_repo::{parse_pokemon_row, POKEMON_COLUMNS};
use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::normalize_name;
use crate::model::owner::{Owner, OwnerId};
use crate::model::pokemon::{Pokemon, PokemonId};
use rusqlite::{params, Row};

/// Owner projection columns, aliased for joins against `owners o`.
pub(crate) const OWNER_COLUMNS: &str = "o.id AS id,
    o.first_name AS first_name,
    o.last_name AS last_name,
    o.country_id AS country_id";

/// Repository interface for owners.
pub trait OwnerRepository {
    fn exists(&self, id: OwnerId) -> RepoResult<bool>;
    fn get_all(&self) -> RepoResult<Vec<Owner>>;
    fn get(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    /// Owners linked to the pokemon through `pokemon_owners`.
    fn get_by_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Owner>>;
    /// Pokemon linked to the owner through `pokemon_owners`.
    fn get_pokemon_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pokemon>>;
    /// First owner whose normalized last name equals `last_name`'s.
    fn find_by_normalized_name(&self, last_name: &str) -> RepoResult<Option<Owner>>;
    fn create(&self, owner: &Owner) -> RepoResult<MutationOutcome>;
    fn update(&self, owner: &Owner) -> RepoResult<MutationOutcome>;
    fn delete(&self, owner: &Owner) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqliteOwnerRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn exists(&self, id: OwnerId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM owners WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Owner>> {
        query_list(
            self.ctx.connection(),
            &format!("SELECT {OWNER_COLUMNS} FROM owners o ORDER BY o.id ASC;"),
            [],
            parse_owner_row,
        )
    }

    fn get(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        query_first(
            self.ctx.connection(),
            &format!("SELECT {OWNER_COLUMNS} FROM owners o WHERE o.id = ?1;"),
            [id],
            parse_owner_row,
        )
    }

    fn get_by_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Owner>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {OWNER_COLUMNS}
                 FROM pokemon_owners po
                 INNER JOIN owners o ON o.id = po.owner_id
                 WHERE po.pokemon_id = ?1
                 ORDER BY o.id ASC;"
            ),
            [pokemon_id],
            parse_owner_row,
        )
    }

    fn get_pokemon_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pokemon>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {POKEMON_COLUMNS}
                 FROM pokemon_owners po
                 INNER JOIN pokemon p ON p.id = po.pokemon_id
                 WHERE po.owner_id = ?1
                 ORDER BY p.id ASC;"
            ),
            [owner_id],
            parse_pokemon_row,
        )
    }

    fn find_by_normalized_name(&self, last_name: &str) -> RepoResult<Option<Owner>> {
        let wanted = normalize_name(last_name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|owner| normalize_name(&owner.last_name) == wanted))
    }

    fn create(&self, owner: &Owner) -> RepoResult<MutationOutcome> {
        owner.validate()?;
        self.ctx.stage(
            "INSERT INTO owners (first_name, last_name, country_id) VALUES (?1, ?2, ?3);",
            params![owner.first_name, owner.last_name, owner.country_id],
        )?;
        commit_created(self.ctx, self.ctx.last_insert_id())
    }

    fn update(&self, owner: &Owner) -> RepoResult<MutationOutcome> {
        owner.validate()?;
        self.ctx.stage(
            "UPDATE owners
             SET
                first_name = ?1,
                last_name = ?2,
                country_id = ?3
             WHERE id = ?4;",
            params![
                owner.first_name,
                owner.last_name,
                owner.country_id,
                owner.id
            ],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, owner: &Owner) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM owners WHERE id = ?1;", [owner.id])?;
        commit(self.ctx)
    }
}

pub(crate) fn parse_owner_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        country_id: row.get("country_id")?,
    })
}
