//! CLI smoke entry point.
//!
//! Opens a catalog store and prints per-entity row counts.
//!
//! Usage: `pokereview_cli [DB_PATH]`. `POKEREVIEW_DB` is used when no path
//! argument is given; an in-memory store otherwise. Setting
//! `POKEREVIEW_LOG_DIR` (absolute) enables file logging.

use log::error;
use pokereview_core::{
    default_log_level, init_logging, CatalogService, CategoryRepository, CountryRepository,
    DataContext, LogConfig, OwnerRepository, PokemonRepository, RepoResult, ReviewRepository,
    ReviewerRepository,
};
use std::process::ExitCode;

const DB_ENV: &str = "POKEREVIEW_DB";
const LOG_DIR_ENV: &str = "POKEREVIEW_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level = std::env::var("POKEREVIEW_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = LogConfig::new(&level, &log_dir).and_then(|config| init_logging(&config))
        {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args().nth(1).or_else(|| std::env::var(DB_ENV).ok());
    let opened = match db_path.as_deref() {
        Some(path) => DataContext::open(path),
        None => DataContext::open_in_memory(),
    };
    let ctx = match opened {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!("failed to open catalog store: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("pokereview_core version={}", pokereview_core::core_version());
    match print_counts(&CatalogService::new(&ctx)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("failed to read catalog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_counts(catalog: &CatalogService<'_>) -> RepoResult<()> {
    println!("categories={}", catalog.categories().get_all()?.len());
    println!("countries={}", catalog.countries().get_all()?.len());
    println!("owners={}", catalog.owners().get_all()?.len());
    println!("pokemon={}", catalog.pokemon().get_all()?.len());
    println!("reviewers={}", catalog.reviewers().get_all()?.len());
    println!("reviews={}", catalog.reviews().get_all()?.len());
    Ok(())
}
