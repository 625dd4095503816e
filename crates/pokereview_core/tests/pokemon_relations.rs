use pokereview_core::{
    Category, CategoryId, CategoryRepository, Country, CountryRepository, DataContext, Owner,
    OwnerId, OwnerRepository, Pokemon, PokemonCategory, PokemonOwner, PokemonRepository,
    RepoError, Review, ReviewRepository, Reviewer, ReviewerRepository, SqliteCategoryRepository,
    SqliteCountryRepository, SqliteOwnerRepository, SqlitePokemonRepository,
    SqliteReviewRepository, SqliteReviewerRepository,
};

struct Fixture {
    ctx: DataContext,
    owner_id: OwnerId,
    category_id: CategoryId,
}

fn setup() -> Fixture {
    let ctx = DataContext::open_in_memory().unwrap();
    let country_id = SqliteCountryRepository::new(&ctx)
        .create(&Country::new("Kanto"))
        .unwrap()
        .created_id
        .unwrap();
    let owner_id = SqliteOwnerRepository::new(&ctx)
        .create(&Owner::new("Ash", "Ketchum", country_id))
        .unwrap()
        .created_id
        .unwrap();
    let category_id = SqliteCategoryRepository::new(&ctx)
        .create(&Category::new("Electric"))
        .unwrap()
        .created_id
        .unwrap();
    Fixture {
        ctx,
        owner_id,
        category_id,
    }
}

fn count(ctx: &DataContext, table: &str) -> i64 {
    ctx.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_writes_pokemon_and_both_links_in_one_commit() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);

    let outcome = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Pikachu"))
        .unwrap();
    assert!(outcome.succeeded());
    assert_eq!(outcome.rows_affected, 3);
    let pokemon_id = outcome.created_id.unwrap();

    assert_eq!(count(&fx.ctx, "pokemon"), 1);
    assert_eq!(
        repo.get_owner_links(pokemon_id).unwrap(),
        vec![PokemonOwner {
            pokemon_id,
            owner_id: fx.owner_id
        }]
    );
    assert_eq!(
        repo.get_category_links(pokemon_id).unwrap(),
        vec![PokemonCategory {
            pokemon_id,
            category_id: fx.category_id
        }]
    );

    let owners = SqliteOwnerRepository::new(&fx.ctx);
    let owned: Vec<_> = owners.get_pokemon_by_owner(fx.owner_id).unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].name, "Pikachu");
    assert_eq!(owners.get_by_pokemon(pokemon_id).unwrap()[0].id, fx.owner_id);

    let categories = SqliteCategoryRepository::new(&fx.ctx);
    let typed = categories.get_pokemon_by_category(fx.category_id).unwrap();
    assert_eq!(typed.len(), 1);
    assert_eq!(typed[0].id, pokemon_id);
}

#[test]
fn create_with_unknown_category_leaves_no_rows_behind() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);

    let err = repo
        .create(fx.owner_id, 999, &Pokemon::new("Missingno"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert_eq!(count(&fx.ctx, "pokemon"), 0);
    assert_eq!(count(&fx.ctx, "pokemon_owners"), 0);
    assert_eq!(count(&fx.ctx, "pokemon_categories"), 0);
}

#[test]
fn get_all_is_ordered_by_id_and_get_by_name_is_exact() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);

    for name in ["Squirtle", "Bulbasaur", "Charmander"] {
        repo.create(fx.owner_id, fx.category_id, &Pokemon::new(name))
            .unwrap();
    }

    let all = repo.get_all().unwrap();
    let ids: Vec<i64> = all.iter().map(|pokemon| pokemon.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(all[0].name, "Squirtle");

    assert!(repo.get_by_name("Bulbasaur").unwrap().is_some());
    assert!(repo.get_by_name("bulbasaur").unwrap().is_none());
    assert!(repo.find_by_normalized_name("bulbasaur ").unwrap().is_some());
}

#[test]
fn update_rewrites_fields_but_does_not_relink_owner_or_category() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    let other_category = SqliteCategoryRepository::new(&fx.ctx)
        .create(&Category::new("Mouse"))
        .unwrap()
        .created_id
        .unwrap();

    let pokemon_id = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Pikachu"))
        .unwrap()
        .created_id
        .unwrap();
    let mut pokemon = repo.get(pokemon_id).unwrap().unwrap();
    pokemon.name = "Raichu".to_string();

    assert!(repo.update(&pokemon).unwrap().succeeded());
    assert_eq!(repo.get(pokemon_id).unwrap().unwrap().name, "Raichu");

    // Field updates keep the existing links; relinking is explicit.
    let links = repo.get_category_links(pokemon_id).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].category_id, fx.category_id);
    assert_ne!(links[0].category_id, other_category);
}

#[test]
fn set_owner_and_set_category_replace_existing_links() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    let country_id = SqliteCountryRepository::new(&fx.ctx)
        .get_by_owner(fx.owner_id)
        .unwrap()
        .unwrap()
        .id;
    let misty = SqliteOwnerRepository::new(&fx.ctx)
        .create(&Owner::new("Misty", "Waterflower", country_id))
        .unwrap()
        .created_id
        .unwrap();
    let mouse = SqliteCategoryRepository::new(&fx.ctx)
        .create(&Category::new("Mouse"))
        .unwrap()
        .created_id
        .unwrap();

    let pokemon_id = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Pikachu"))
        .unwrap()
        .created_id
        .unwrap();

    let outcome = repo.set_owner(pokemon_id, misty).unwrap();
    assert!(outcome.succeeded());
    assert_eq!(outcome.rows_affected, 2);
    assert_eq!(
        repo.get_owner_links(pokemon_id).unwrap(),
        vec![PokemonOwner {
            pokemon_id,
            owner_id: misty
        }]
    );

    assert!(repo.set_category(pokemon_id, mouse).unwrap().succeeded());
    assert_eq!(
        repo.get_category_links(pokemon_id).unwrap(),
        vec![PokemonCategory {
            pokemon_id,
            category_id: mouse
        }]
    );
}

#[test]
fn deleting_pokemon_cascades_join_rows() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);

    let pokemon_id = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Eevee"))
        .unwrap()
        .created_id
        .unwrap();
    let pokemon = repo.get(pokemon_id).unwrap().unwrap();

    assert!(repo.delete(&pokemon).unwrap().succeeded());
    assert!(!repo.exists(pokemon_id).unwrap());
    assert_eq!(count(&fx.ctx, "pokemon_owners"), 0);
    assert_eq!(count(&fx.ctx, "pokemon_categories"), 0);
    assert!(!repo.delete(&pokemon).unwrap().succeeded());
}

#[test]
fn deleting_owner_or_category_removes_their_links() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    let pokemon_id = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Eevee"))
        .unwrap()
        .created_id
        .unwrap();

    let categories = SqliteCategoryRepository::new(&fx.ctx);
    let category = categories.get(fx.category_id).unwrap().unwrap();
    assert!(categories.delete(&category).unwrap().succeeded());
    assert!(repo.get_category_links(pokemon_id).unwrap().is_empty());

    let owners = SqliteOwnerRepository::new(&fx.ctx);
    let owner = owners.get(fx.owner_id).unwrap().unwrap();
    assert!(owners.delete(&owner).unwrap().succeeded());
    assert!(repo.get_owner_links(pokemon_id).unwrap().is_empty());

    assert!(repo.exists(pokemon_id).unwrap());
}

#[test]
fn deleting_pokemon_with_reviews_is_rejected() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    let pokemon_id = repo
        .create(fx.owner_id, fx.category_id, &Pokemon::new("Snorlax"))
        .unwrap()
        .created_id
        .unwrap();
    let reviewer_id = SqliteReviewerRepository::new(&fx.ctx)
        .create(&Reviewer::new("Gary", "Oak"))
        .unwrap()
        .created_id
        .unwrap();
    SqliteReviewRepository::new(&fx.ctx)
        .create(&Review::new("Sleepy", "Blocks the road", 3, pokemon_id, reviewer_id))
        .unwrap();

    let pokemon = repo.get(pokemon_id).unwrap().unwrap();
    let err = repo.delete(&pokemon).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.exists(pokemon_id).unwrap());
    assert_eq!(count(&fx.ctx, "pokemon_owners"), 1);
}

#[test]
fn rating_is_zero_without_reviews_and_exact_mean_otherwise() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    let reviews = SqliteReviewRepository::new(&fx.ctx);
    let reviewer_id = SqliteReviewerRepository::new(&fx.ctx)
        .create(&Reviewer::new("Gary", "Oak"))
        .unwrap()
        .created_id
        .unwrap();

    let rate = |name: &str, ratings: &[i64]| -> f64 {
        let pokemon_id = repo
            .create(fx.owner_id, fx.category_id, &Pokemon::new(name))
            .unwrap()
            .created_id
            .unwrap();
        for (idx, rating) in ratings.iter().enumerate() {
            let review = Review::new(
                format!("{name} #{idx}"),
                "",
                *rating,
                pokemon_id,
                reviewer_id,
            );
            assert!(reviews.create(&review).unwrap().succeeded());
        }
        repo.get_rating(pokemon_id).unwrap()
    };

    assert_eq!(rate("Magikarp", &[]), 0.0);
    assert_eq!(rate("Pikachu", &[3, 4]), 3.5);
    assert_eq!(rate("Mew", &[5]), 5.0);

    let mean = rate("Psyduck", &[2, 3, 5]);
    assert_eq!(mean, 10.0 / 3.0);
    assert!(mean > 3.33 && mean < 3.34);
}

#[test]
fn rating_of_unknown_pokemon_is_zero() {
    let fx = setup();
    let repo = SqlitePokemonRepository::new(&fx.ctx);
    assert_eq!(repo.get_rating(12345).unwrap(), 0.0);
}
