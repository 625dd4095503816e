//! Pokemon repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `pokemon` plus management of its owner/category join rows.
//! - Compute the review-based rating of one pokemon.
//!
//! # Invariants
//! - `create` writes the pokemon row, one owner link and one category link
//!   in a single unit of work.
//! - `update` rewrites the pokemon row only; links change through
//!   `set_owner`/`set_category`.
//! - `delete` never removes reviews. Storage rejects deleting a pokemon that
//!   still has reviews; callers clear them first.
//! - `get_all` is ordered by id ascending.

use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::category::CategoryId;
use crate::model::normalize_name;
use crate::model::owner::OwnerId;
use crate::model::pokemon::{Pokemon, PokemonCategory, PokemonId, PokemonOwner};
use rusqlite::{params, Row};

/// Pokemon projection columns, aliased for joins against `pokemon p`.
pub(crate) const POKEMON_COLUMNS: &str = "p.id AS id, p.name AS name";

/// Repository interface for pokemon and their join rows.
pub trait PokemonRepository {
    fn exists(&self, id: PokemonId) -> RepoResult<bool>;
    /// All pokemon ordered by id ascending.
    fn get_all(&self) -> RepoResult<Vec<Pokemon>>;
    fn get(&self, id: PokemonId) -> RepoResult<Option<Pokemon>>;
    /// Exact-name lookup.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>>;
    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Pokemon>>;
    /// Category links of one pokemon.
    fn get_category_links(&self, pokemon_id: PokemonId) -> RepoResult<Vec<PokemonCategory>>;
    /// Owner links of one pokemon.
    fn get_owner_links(&self, pokemon_id: PokemonId) -> RepoResult<Vec<PokemonOwner>>;
    /// Mean review rating; `0.0` when the pokemon has no reviews.
    fn get_rating(&self, pokemon_id: PokemonId) -> RepoResult<f64>;
    /// Inserts the pokemon and links it to one owner and one category.
    fn create(
        &self,
        owner_id: OwnerId,
        category_id: CategoryId,
        pokemon: &Pokemon,
    ) -> RepoResult<MutationOutcome>;
    /// Rewrites the pokemon row. Owner and category links are left as they are.
    fn update(&self, pokemon: &Pokemon) -> RepoResult<MutationOutcome>;
    /// Replaces every owner link of the pokemon with a link to `owner_id`.
    fn set_owner(&self, pokemon_id: PokemonId, owner_id: OwnerId) -> RepoResult<MutationOutcome>;
    /// Replaces every category link of the pokemon with a link to `category_id`.
    fn set_category(
        &self,
        pokemon_id: PokemonId,
        category_id: CategoryId,
    ) -> RepoResult<MutationOutcome>;
    fn delete(&self, pokemon: &Pokemon) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed pokemon repository.
pub struct SqlitePokemonRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqlitePokemonRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn exists(&self, id: PokemonId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM pokemon WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Pokemon>> {
        query_list(
            self.ctx.connection(),
            &format!("SELECT {POKEMON_COLUMNS} FROM pokemon p ORDER BY p.id ASC;"),
            [],
            parse_pokemon_row,
        )
    }

    fn get(&self, id: PokemonId) -> RepoResult<Option<Pokemon>> {
        query_first(
            self.ctx.connection(),
            &format!("SELECT {POKEMON_COLUMNS} FROM pokemon p WHERE p.id = ?1;"),
            [id],
            parse_pokemon_row,
        )
    }

    fn get_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>> {
        query_first(
            self.ctx.connection(),
            &format!(
                "SELECT {POKEMON_COLUMNS} FROM pokemon p WHERE p.name = ?1 ORDER BY p.id ASC;"
            ),
            [name],
            parse_pokemon_row,
        )
    }

    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Pokemon>> {
        let wanted = normalize_name(name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|pokemon| normalize_name(&pokemon.name) == wanted))
    }

    fn get_category_links(&self, pokemon_id: PokemonId) -> RepoResult<Vec<PokemonCategory>> {
        query_list(
            self.ctx.connection(),
            "SELECT pokemon_id, category_id
             FROM pokemon_categories
             WHERE pokemon_id = ?1
             ORDER BY category_id ASC;",
            [pokemon_id],
            |row| {
                Ok(PokemonCategory {
                    pokemon_id: row.get("pokemon_id")?,
                    category_id: row.get("category_id")?,
                })
            },
        )
    }

    fn get_owner_links(&self, pokemon_id: PokemonId) -> RepoResult<Vec<PokemonOwner>> {
        query_list(
            self.ctx.connection(),
            "SELECT pokemon_id, owner_id
             FROM pokemon_owners
             WHERE pokemon_id = ?1
             ORDER BY owner_id ASC;",
            [pokemon_id],
            |row| {
                Ok(PokemonOwner {
                    pokemon_id: row.get("pokemon_id")?,
                    owner_id: row.get("owner_id")?,
                })
            },
        )
    }

    fn get_rating(&self, pokemon_id: PokemonId) -> RepoResult<f64> {
        let (count, sum): (i64, i64) = self.ctx.connection().query_row(
            "SELECT COUNT(*), COALESCE(SUM(rating), 0)
             FROM reviews
             WHERE pokemon_id = ?1;",
            [pokemon_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum as f64 / count as f64)
    }

    fn create(
        &self,
        owner_id: OwnerId,
        category_id: CategoryId,
        pokemon: &Pokemon,
    ) -> RepoResult<MutationOutcome> {
        pokemon.validate()?;
        self.ctx.stage(
            "INSERT INTO pokemon (name) VALUES (?1);",
            params![pokemon.name],
        )?;
        let pokemon_id = self.ctx.last_insert_id();

        self.ctx.stage(
            "INSERT INTO pokemon_owners (pokemon_id, owner_id) VALUES (?1, ?2);",
            params![pokemon_id, owner_id],
        )?;
        self.ctx.stage(
            "INSERT INTO pokemon_categories (pokemon_id, category_id) VALUES (?1, ?2);",
            params![pokemon_id, category_id],
        )?;

        commit_created(self.ctx, pokemon_id)
    }

    fn update(&self, pokemon: &Pokemon) -> RepoResult<MutationOutcome> {
        pokemon.validate()?;
        self.ctx.stage(
            "UPDATE pokemon SET name = ?1 WHERE id = ?2;",
            params![pokemon.name, pokemon.id],
        )?;
        commit(self.ctx)
    }

    fn set_owner(&self, pokemon_id: PokemonId, owner_id: OwnerId) -> RepoResult<MutationOutcome> {
        self.ctx.stage(
            "DELETE FROM pokemon_owners WHERE pokemon_id = ?1;",
            [pokemon_id],
        )?;
        self.ctx.stage(
            "INSERT INTO pokemon_owners (pokemon_id, owner_id) VALUES (?1, ?2);",
            params![pokemon_id, owner_id],
        )?;
        commit(self.ctx)
    }

    fn set_category(
        &self,
        pokemon_id: PokemonId,
        category_id: CategoryId,
    ) -> RepoResult<MutationOutcome> {
        self.ctx.stage(
            "DELETE FROM pokemon_categories WHERE pokemon_id = ?1;",
            [pokemon_id],
        )?;
        self.ctx.stage(
            "INSERT INTO pokemon_categories (pokemon_id, category_id) VALUES (?1, ?2);",
            params![pokemon_id, category_id],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, pokemon: &Pokemon) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM pokemon WHERE id = ?1;", [pokemon.id])?;
        commit(self.ctx)
    }
}

pub(crate) fn parse_pokemon_row(row: &Row<'_>) -> rusqlite::Result<Pokemon> {
    Ok(Pokemon {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
