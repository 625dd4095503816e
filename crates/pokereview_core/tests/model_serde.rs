use pokereview_core::{Owner, PokemonOwner, Review};
use serde_json::json;

#[test]
fn owner_serializes_with_snake_case_fields() {
    let mut owner = Owner::new("Ash", "Ketchum", 3);
    owner.id = 7;

    let value = serde_json::to_value(&owner).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 7,
            "first_name": "Ash",
            "last_name": "Ketchum",
            "country_id": 3
        })
    );
}

#[test]
fn review_deserializes_from_stored_shape() {
    let review: Review = serde_json::from_value(json!({
        "id": 11,
        "title": "Speedy",
        "text": "Outran the bus",
        "rating": 4,
        "pokemon_id": 2,
        "reviewer_id": 5
    }))
    .unwrap();

    assert_eq!(review.id, 11);
    assert_eq!(review.rating, 4);
    assert!(review.validate().is_ok());
}

#[test]
fn join_row_serializes_both_keys() {
    let link = PokemonOwner {
        pokemon_id: 1,
        owner_id: 2,
    };
    assert_eq!(
        serde_json::to_value(link).unwrap(),
        json!({ "pokemon_id": 1, "owner_id": 2 })
    );
}
