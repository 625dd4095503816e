//! Catalog use-case service.
//!
//! # Responsibility
//! - Reject duplicate names (trimmed, case-insensitive) before any create.
//! - Check referenced ids exist before linking to them.
//! - Orchestrate deleting a pokemon after its reviews.
//!
//! # Invariants
//! - Every create/delete maps a zero-row commit to `PersistenceFailed`.
//! - `delete_pokemon` commits twice: reviews first, then the pokemon. A
//!   failure between the two leaves the pokemon present without reviews.

use crate::db::DataContext;
use crate::model::category::{Category, CategoryId};
use crate::model::country::{Country, CountryId};
use crate::model::owner::{Owner, OwnerId};
use crate::model::pokemon::{Pokemon, PokemonId};
use crate::model::review::{Review, ReviewId};
use crate::model::reviewer::{Reviewer, ReviewerId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::country_repo::{CountryRepository, SqliteCountryRepository};
use crate::repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
use crate::repo::pokemon_repo::{PokemonRepository, SqlitePokemonRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
use crate::repo::{MutationOutcome, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Another entity of the same kind already uses this normalized name.
    Duplicate { entity: &'static str, name: String },
    /// Referenced entity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Commit succeeded but changed no rows.
    PersistenceFailed { operation: &'static str },
    /// Validation or storage failure from the repository layer.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { entity, name } => write!(f, "{entity} already exists: `{name}`"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::PersistenceFailed { operation } => {
                write!(f, "{operation} did not persist any row")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Catalog facade over the six repositories sharing one [`DataContext`].
pub struct CatalogService<'ctx> {
    categories: SqliteCategoryRepository<'ctx>,
    countries: SqliteCountryRepository<'ctx>,
    owners: SqliteOwnerRepository<'ctx>,
    pokemon: SqlitePokemonRepository<'ctx>,
    reviews: SqliteReviewRepository<'ctx>,
    reviewers: SqliteReviewerRepository<'ctx>,
}

impl<'ctx> CatalogService<'ctx> {
    pub fn new(ctx: &'ctx DataContext) -> Self {
        Self {
            categories: SqliteCategoryRepository::new(ctx),
            countries: SqliteCountryRepository::new(ctx),
            owners: SqliteOwnerRepository::new(ctx),
            pokemon: SqlitePokemonRepository::new(ctx),
            reviews: SqliteReviewRepository::new(ctx),
            reviewers: SqliteReviewerRepository::new(ctx),
        }
    }

    pub fn categories(&self) -> &SqliteCategoryRepository<'ctx> {
        &self.categories
    }

    pub fn countries(&self) -> &SqliteCountryRepository<'ctx> {
        &self.countries
    }

    pub fn owners(&self) -> &SqliteOwnerRepository<'ctx> {
        &self.owners
    }

    pub fn pokemon(&self) -> &SqlitePokemonRepository<'ctx> {
        &self.pokemon
    }

    pub fn reviews(&self) -> &SqliteReviewRepository<'ctx> {
        &self.reviews
    }

    pub fn reviewers(&self) -> &SqliteReviewerRepository<'ctx> {
        &self.reviewers
    }

    pub fn create_category(&self, name: &str) -> ServiceResult<CategoryId> {
        if self.categories.find_by_normalized_name(name)?.is_some() {
            return Err(duplicate("category", name));
        }
        let outcome = self.categories.create(&Category::new(name))?;
        created_id("category_create", outcome)
    }

    pub fn create_country(&self, name: &str) -> ServiceResult<CountryId> {
        if self.countries.find_by_normalized_name(name)?.is_some() {
            return Err(duplicate("country", name));
        }
        let outcome = self.countries.create(&Country::new(name))?;
        created_id("country_create", outcome)
    }

    /// Creates an owner living in `country_id`. Duplicates key on last name.
    pub fn create_owner(
        &self,
        country_id: CountryId,
        first_name: &str,
        last_name: &str,
    ) -> ServiceResult<OwnerId> {
        if self.owners.find_by_normalized_name(last_name)?.is_some() {
            return Err(duplicate("owner", last_name));
        }
        if !self.countries.exists(country_id)? {
            return Err(ServiceError::NotFound {
                entity: "country",
                id: country_id,
            });
        }
        let outcome = self
            .owners
            .create(&Owner::new(first_name, last_name, country_id))?;
        created_id("owner_create", outcome)
    }

    /// Creates a pokemon linked to one owner and one category.
    pub fn create_pokemon(
        &self,
        owner_id: OwnerId,
        category_id: CategoryId,
        name: &str,
    ) -> ServiceResult<PokemonId> {
        if self.pokemon.find_by_normalized_name(name)?.is_some() {
            return Err(duplicate("pokemon", name));
        }
        if !self.owners.exists(owner_id)? {
            return Err(ServiceError::NotFound {
                entity: "owner",
                id: owner_id,
            });
        }
        if !self.categories.exists(category_id)? {
            return Err(ServiceError::NotFound {
                entity: "category",
                id: category_id,
            });
        }
        let outcome = self
            .pokemon
            .create(owner_id, category_id, &Pokemon::new(name))?;
        created_id("pokemon_create", outcome)
    }

    /// Creates a reviewer. Duplicates key on last name.
    pub fn create_reviewer(&self, first_name: &str, last_name: &str) -> ServiceResult<ReviewerId> {
        if self.reviewers.find_by_normalized_name(last_name)?.is_some() {
            return Err(duplicate("reviewer", last_name));
        }
        let outcome = self
            .reviewers
            .create(&Reviewer::new(first_name, last_name))?;
        created_id("reviewer_create", outcome)
    }

    /// Creates a review of `pokemon_id` by `reviewer_id`. Duplicates key on title.
    pub fn create_review(
        &self,
        reviewer_id: ReviewerId,
        pokemon_id: PokemonId,
        title: &str,
        text: &str,
        rating: i64,
    ) -> ServiceResult<ReviewId> {
        if self.reviews.find_by_normalized_name(title)?.is_some() {
            return Err(duplicate("review", title));
        }
        if !self.pokemon.exists(pokemon_id)? {
            return Err(ServiceError::NotFound {
                entity: "pokemon",
                id: pokemon_id,
            });
        }
        if !self.reviewers.exists(reviewer_id)? {
            return Err(ServiceError::NotFound {
                entity: "reviewer",
                id: reviewer_id,
            });
        }
        let review = Review::new(title, text, rating, pokemon_id, reviewer_id);
        let outcome = self.reviews.create(&review)?;
        created_id("review_create", outcome)
    }

    /// Deletes a pokemon after removing all of its reviews.
    pub fn delete_pokemon(&self, pokemon_id: PokemonId) -> ServiceResult<()> {
        let pokemon = self
            .pokemon
            .get(pokemon_id)?
            .ok_or(ServiceError::NotFound {
                entity: "pokemon",
                id: pokemon_id,
            })?;

        let reviews = self.reviews.get_by_pokemon(pokemon_id)?;
        if !reviews.is_empty() {
            let outcome = self.reviews.delete_many(&reviews)?;
            ensure_persisted("review_delete_many", outcome)?;
        }

        let outcome = self.pokemon.delete(&pokemon)?;
        ensure_persisted("pokemon_delete", outcome)?;
        info!(
            "event=pokemon_delete module=service status=ok pokemon_id={} reviews_removed={}",
            pokemon_id,
            reviews.len()
        );
        Ok(())
    }

    /// Mean review rating of an existing pokemon.
    pub fn pokemon_rating(&self, pokemon_id: PokemonId) -> ServiceResult<f64> {
        if !self.pokemon.exists(pokemon_id)? {
            return Err(ServiceError::NotFound {
                entity: "pokemon",
                id: pokemon_id,
            });
        }
        Ok(self.pokemon.get_rating(pokemon_id)?)
    }
}

fn duplicate(entity: &'static str, name: &str) -> ServiceError {
    warn!("event=duplicate_rejected module=service status=error entity={entity}");
    ServiceError::Duplicate {
        entity,
        name: name.to_string(),
    }
}

fn ensure_persisted(
    operation: &'static str,
    outcome: MutationOutcome,
) -> ServiceResult<MutationOutcome> {
    if !outcome.succeeded() {
        warn!("event={operation} module=service status=error error_code=no_rows_affected");
        return Err(ServiceError::PersistenceFailed { operation });
    }
    Ok(outcome)
}

fn created_id(operation: &'static str, outcome: MutationOutcome) -> ServiceResult<i64> {
    let outcome = ensure_persisted(operation, outcome)?;
    let id = outcome
        .created_id
        .ok_or(ServiceError::PersistenceFailed { operation })?;
    info!("event={operation} module=service status=ok id={id}");
    Ok(id)
}
