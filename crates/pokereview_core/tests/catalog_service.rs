use pokereview_core::{
    CatalogService, CategoryRepository, DataContext, PokemonRepository, ReviewRepository,
    ServiceError,
};

struct Seed {
    country_id: i64,
    owner_id: i64,
    category_id: i64,
    reviewer_id: i64,
}

fn seed(catalog: &CatalogService<'_>) -> Seed {
    let country_id = catalog.create_country("Kanto").unwrap();
    let owner_id = catalog.create_owner(country_id, "Ash", "Ketchum").unwrap();
    let category_id = catalog.create_category("Water").unwrap();
    let reviewer_id = catalog.create_reviewer("Gary", "Oak").unwrap();
    Seed {
        country_id,
        owner_id,
        category_id,
        reviewer_id,
    }
}

#[test]
fn duplicate_names_are_rejected_after_normalization() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);

    let err = catalog.create_category("water ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Duplicate {
            entity: "category",
            ..
        }
    ));
    assert_eq!(catalog.categories().get_all().unwrap().len(), 1);

    assert!(matches!(
        catalog.create_country(" KANTO").unwrap_err(),
        ServiceError::Duplicate {
            entity: "country",
            ..
        }
    ));
    assert!(matches!(
        catalog
            .create_owner(seed.country_id, "Delia", "ketchum")
            .unwrap_err(),
        ServiceError::Duplicate { entity: "owner", .. }
    ));

    catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Squirtle")
        .unwrap();
    assert!(matches!(
        catalog
            .create_pokemon(seed.owner_id, seed.category_id, "squirtle")
            .unwrap_err(),
        ServiceError::Duplicate {
            entity: "pokemon",
            ..
        }
    ));

    assert!(matches!(
        catalog.create_reviewer("Blue", "OAK").unwrap_err(),
        ServiceError::Duplicate {
            entity: "reviewer",
            ..
        }
    ));
}

#[test]
fn duplicate_review_titles_are_rejected() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let pokemon_id = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Psyduck")
        .unwrap();

    catalog
        .create_review(seed.reviewer_id, pokemon_id, "Confused", "always", 2)
        .unwrap();
    assert!(matches!(
        catalog
            .create_review(seed.reviewer_id, pokemon_id, "CONFUSED", "again", 3)
            .unwrap_err(),
        ServiceError::Duplicate {
            entity: "review",
            ..
        }
    ));
}

#[test]
fn missing_references_are_reported_as_not_found() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);

    assert!(matches!(
        catalog.create_owner(999, "Brock", "Harrison").unwrap_err(),
        ServiceError::NotFound {
            entity: "country",
            id: 999
        }
    ));
    assert!(matches!(
        catalog
            .create_pokemon(999, seed.category_id, "Onix")
            .unwrap_err(),
        ServiceError::NotFound {
            entity: "owner",
            id: 999
        }
    ));
    assert!(matches!(
        catalog
            .create_pokemon(seed.owner_id, 999, "Onix")
            .unwrap_err(),
        ServiceError::NotFound {
            entity: "category",
            id: 999
        }
    ));
    assert!(matches!(
        catalog
            .create_review(seed.reviewer_id, 999, "Rocky", "", 4)
            .unwrap_err(),
        ServiceError::NotFound {
            entity: "pokemon",
            id: 999
        }
    ));
    assert!(matches!(
        catalog.delete_pokemon(999).unwrap_err(),
        ServiceError::NotFound {
            entity: "pokemon",
            id: 999
        }
    ));
    assert!(matches!(
        catalog.pokemon_rating(999).unwrap_err(),
        ServiceError::NotFound {
            entity: "pokemon",
            id: 999
        }
    ));
    assert!(!ctx.has_pending_unit());
}

#[test]
fn review_by_unknown_reviewer_is_not_found() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let pokemon_id = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Onix")
        .unwrap();

    assert!(matches!(
        catalog
            .create_review(999, pokemon_id, "Rocky", "", 4)
            .unwrap_err(),
        ServiceError::NotFound {
            entity: "reviewer",
            id: 999
        }
    ));
    assert!(catalog.reviews().get_all().unwrap().is_empty());
}

#[test]
fn delete_pokemon_removes_its_reviews_first() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let doomed = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Magikarp")
        .unwrap();
    let survivor = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Gyarados")
        .unwrap();

    catalog
        .create_review(seed.reviewer_id, doomed, "Splash", "", 1)
        .unwrap();
    catalog
        .create_review(seed.reviewer_id, doomed, "Flop", "", 2)
        .unwrap();
    catalog
        .create_review(seed.reviewer_id, survivor, "Fierce", "", 5)
        .unwrap();

    catalog.delete_pokemon(doomed).unwrap();

    assert!(!catalog.pokemon().exists(doomed).unwrap());
    assert!(catalog.reviews().get_by_pokemon(doomed).unwrap().is_empty());
    assert_eq!(catalog.reviews().get_by_pokemon(survivor).unwrap().len(), 1);
    assert!(catalog.pokemon().get_owner_links(doomed).unwrap().is_empty());
}

#[test]
fn delete_pokemon_without_reviews_skips_review_cleanup() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let pokemon_id = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Ditto")
        .unwrap();

    catalog.delete_pokemon(pokemon_id).unwrap();
    assert!(!catalog.pokemon().exists(pokemon_id).unwrap());
}

#[test]
fn pokemon_rating_averages_reviews() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let pokemon_id = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Lapras")
        .unwrap();

    assert_eq!(catalog.pokemon_rating(pokemon_id).unwrap(), 0.0);
    catalog
        .create_review(seed.reviewer_id, pokemon_id, "Gentle", "", 3)
        .unwrap();
    catalog
        .create_review(seed.reviewer_id, pokemon_id, "Strong swimmer", "", 4)
        .unwrap();
    assert_eq!(catalog.pokemon_rating(pokemon_id).unwrap(), 3.5);
}

#[test]
fn invalid_input_surfaces_repository_validation() {
    let ctx = DataContext::open_in_memory().unwrap();
    let catalog = CatalogService::new(&ctx);
    let seed = seed(&catalog);
    let pokemon_id = catalog
        .create_pokemon(seed.owner_id, seed.category_id, "Jigglypuff")
        .unwrap();

    assert!(matches!(
        catalog.create_category("   ").unwrap_err(),
        ServiceError::Repo(_)
    ));
    assert!(matches!(
        catalog
            .create_review(seed.reviewer_id, pokemon_id, "Loud", "", 9)
            .unwrap_err(),
        ServiceError::Repo(_)
    ));
}
