//! Data-access and relationship-integrity core of the pokemon review catalog.
//! Repositories here are the single source of truth for cross-entity wiring.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{CommitOutcome, DataContext, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::country::{Country, CountryId};
pub use model::owner::{Owner, OwnerId};
pub use model::pokemon::{Pokemon, PokemonCategory, PokemonId, PokemonOwner};
pub use model::review::{Review, ReviewId, RATING_MAX, RATING_MIN};
pub use model::reviewer::{Reviewer, ReviewerId};
pub use model::{names_match, normalize_name, ModelValidationError, UNSAVED_ID};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::country_repo::{CountryRepository, SqliteCountryRepository};
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::pokemon_repo::{PokemonRepository, SqlitePokemonRepository};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
pub use repo::{MutationOutcome, RepoError, RepoResult};
pub use service::catalog_service::{CatalogService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
