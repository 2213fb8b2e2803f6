use catalog_core::{derive_revision_date, Product};

fn sample() -> Product {
    Product {
        id: "uno".to_string(),
        name: "Tarjeta Crédito".to_string(),
        description: "Producto para compras a crédito.".to_string(),
        logo: "assets-1.png".to_string(),
        date_release: "2025-01-01".to_string(),
        date_revision: "2026-01-01".to_string(),
    }
}

#[test]
fn product_serializes_with_backend_field_names() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["id"], "uno");
    assert_eq!(json["date_release"], "2025-01-01");
    assert_eq!(json["date_revision"], "2026-01-01");

    let decoded: Product = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, sample());
}

#[test]
fn update_payload_omits_id() {
    let (id, update) = sample().into_update();
    assert_eq!(id, "uno");

    let json = serde_json::to_value(&update).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["name"], "Tarjeta Crédito");

    assert_eq!(update.with_id("uno"), sample());
}

#[test]
fn revision_is_release_plus_one_year_with_rollover() {
    assert_eq!(derive_revision_date("2025-01-20"), "2026-01-20");
    assert_eq!(derive_revision_date("2024-02-29"), "2025-03-01");
    assert_eq!(derive_revision_date(""), "");
}

#[test]
fn needle_matching_covers_id_name_and_description() {
    let product = sample();
    assert!(product.matches_needle("uno"));
    assert!(product.matches_needle("tarjeta"));
    assert!(product.matches_needle("compras"));
    assert!(!product.matches_needle("assets"));
}
