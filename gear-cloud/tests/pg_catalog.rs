//! PgCatalog against a real database
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`; each test gets
//! a fresh database with the crate migrations applied.

use gear_cloud::catalog::{CatalogKind, CatalogResolver, CatalogStore, NewItem, get_or_create_binding};
use gear_cloud::db;
use gear_cloud::db::catalog::PgCatalog;
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    db::users::create(pool, &format!("{name}@example.com"), name, "x")
        .await
        .unwrap()
        .id
}

fn new_item(user_id: i64, name: &str, sort_order: i32) -> NewItem {
    NewItem {
        user_id,
        brand_id: None,
        product_id: None,
        product_variant_id: None,
        category_id: None,
        sort_order,
        name: name.into(),
        weight: None,
        unit: None,
        price: None,
        consumable: false,
        product_url: None,
        wishlist: false,
        notes: None,
    }
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn brand_names_match_case_insensitively(pool: PgPool) {
    let store = PgCatalog::new(pool.clone());
    let resolver = CatalogResolver::new(&store);

    let first = resolver
        .resolve_or_create(CatalogKind::Brand, "Osprey", None)
        .await
        .unwrap();
    let second = resolver
        .resolve_or_create(CatalogKind::Brand, "osprey", None)
        .await
        .unwrap();
    assert_eq!(first, second);

    let (a, b) = tokio::join!(
        resolver.resolve_or_create(CatalogKind::Brand, "Durston", None),
        resolver.resolve_or_create(CatalogKind::Brand, "DURSTON", None),
    );
    assert_eq!(a.unwrap(), b.unwrap());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM brands")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 2);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn bindings_are_ordered_and_idempotent(pool: PgPool) {
    let user = seed_user(&pool, "hiker").await;
    let store = PgCatalog::new(pool.clone());
    let resolver = CatalogResolver::new(&store);

    let shelter = resolver.find_or_create_category(user, "Shelter").await.unwrap();
    let kitchen = resolver.find_or_create_category(user, "Kitchen").await.unwrap();

    let first = get_or_create_binding(&store, shelter, user).await.unwrap();
    let second = get_or_create_binding(&store, kitchen, user).await.unwrap();
    let again = get_or_create_binding(&store, shelter, user).await.unwrap();
    assert_eq!(first, again);

    let orders: Vec<(i64, i32)> =
        sqlx::query_as("SELECT id, sort_order FROM item_categories WHERE user_id = $1 ORDER BY id")
            .bind(user)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(orders, vec![(first, 0), (second, 1)]);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn bulk_insert_continues_sort_order(pool: PgPool) {
    let user = seed_user(&pool, "walker").await;
    let store = PgCatalog::new(pool.clone());

    let first = store
        .insert_items(&[new_item(user, "Tent", 0), new_item(user, "Pad", 1)])
        .await
        .unwrap();
    let second = store.insert_items(&[new_item(user, "Stove", 0)]).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);

    let orders: Vec<(String, i32)> =
        sqlx::query_as("SELECT name, sort_order FROM items WHERE user_id = $1 ORDER BY sort_order")
            .bind(user)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        orders,
        vec![
            ("Tent".to_string(), 0),
            ("Pad".to_string(), 1),
            ("Stove".to_string(), 2),
        ]
    );
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn product_exists_only_under_its_brand(pool: PgPool) {
    let store = PgCatalog::new(pool);
    let resolver = CatalogResolver::new(&store);

    let nemo = resolver
        .resolve_or_create(CatalogKind::Brand, "Nemo", None)
        .await
        .unwrap();
    let zpacks = resolver
        .resolve_or_create(CatalogKind::Brand, "Zpacks", None)
        .await
        .unwrap();
    let tensor = resolver
        .resolve_or_create(CatalogKind::Product, "Tensor", Some(nemo))
        .await
        .unwrap();
    let regular = resolver
        .resolve_or_create(CatalogKind::Variant, "Regular", Some(tensor))
        .await
        .unwrap();

    assert!(store.exists(CatalogKind::Product, tensor, Some(nemo)).await.unwrap());
    assert!(!store.exists(CatalogKind::Product, tensor, Some(zpacks)).await.unwrap());
    assert!(store.exists(CatalogKind::Variant, regular, Some(tensor)).await.unwrap());
    assert!(!store.exists(CatalogKind::Variant, regular, Some(tensor + 1000)).await.unwrap());
    assert!(store.exists(CatalogKind::Brand, zpacks, None).await.unwrap());
}
