//! Category repository contract and SQLite implementation.

use super::pokemon_repo::{parse_pokemon_row, POKEMON_COLUMNS};
use super::{
    commit, commit_created, query_exists, query_first, query_list, MutationOutcome, RepoResult,
};
use crate::db::DataContext;
use crate::model::category::{Category, CategoryId};
use crate::model::normalize_name;
use crate::model::pokemon::Pokemon;
use rusqlite::{params, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name FROM categories";

/// Repository interface for categories.
pub trait CategoryRepository {
    fn exists(&self, id: CategoryId) -> RepoResult<bool>;
    /// All categories ordered by id ascending.
    fn get_all(&self) -> RepoResult<Vec<Category>>;
    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Pokemon linked to the category through `pokemon_categories`.
    fn get_pokemon_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Pokemon>>;
    /// First category whose trimmed, case-folded name equals `name`'s.
    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn create(&self, category: &Category) -> RepoResult<MutationOutcome>;
    fn update(&self, category: &Category) -> RepoResult<MutationOutcome>;
    /// Removes the category; its pokemon links go with it.
    fn delete(&self, category: &Category) -> RepoResult<MutationOutcome>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'ctx> {
    ctx: &'ctx DataContext,
}

impl<'ctx> SqliteCategoryRepository<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self { ctx }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn exists(&self, id: CategoryId) -> RepoResult<bool> {
        query_exists(
            self.ctx.connection(),
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Category>> {
        query_list(
            self.ctx.connection(),
            &format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_category_row,
        )
    }

    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        query_first(
            self.ctx.connection(),
            &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_category_row,
        )
    }

    fn get_pokemon_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Pokemon>> {
        query_list(
            self.ctx.connection(),
            &format!(
                "SELECT {POKEMON_COLUMNS}
                 FROM pokemon_categories pc
                 INNER JOIN pokemon p ON p.id = pc.pokemon_id
                 WHERE pc.category_id = ?1
                 ORDER BY p.id ASC;"
            ),
            [category_id],
            parse_pokemon_row,
        )
    }

    fn find_by_normalized_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let wanted = normalize_name(name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|category| normalize_name(&category.name) == wanted))
    }

    fn create(&self, category: &Category) -> RepoResult<MutationOutcome> {
        category.validate()?;
        self.ctx.stage(
            "INSERT INTO categories (name) VALUES (?1);",
            params![category.name],
        )?;
        commit_created(self.ctx, self.ctx.last_insert_id())
    }

    fn update(&self, category: &Category) -> RepoResult<MutationOutcome> {
        category.validate()?;
        self.ctx.stage(
            "UPDATE categories SET name = ?1 WHERE id = ?2;",
            params![category.name, category.id],
        )?;
        commit(self.ctx)
    }

    fn delete(&self, category: &Category) -> RepoResult<MutationOutcome> {
        self.ctx
            .stage("DELETE FROM categories WHERE id = ?1;", [category.id])?;
        commit(self.ctx)
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
