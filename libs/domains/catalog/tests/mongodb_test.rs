//! Integration tests for the MongoDB product repository
//!
//! These run against a real MongoDB started with testcontainers and need
//! Docker: `cargo test -p domain_catalog -- --ignored`

use domain_catalog::*;
use ::mongodb::bson::doc;
use std::time::Duration;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};
use uuid::Uuid;

fn input(builder: &TestDataBuilder, name: &str, price: f64, category: Uuid) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: format!("{name} for integration tests"),
        price,
        category,
        quantity: 3,
        shipping: true,
        photo: ProductPhoto::new(builder.photo_bytes(32), "image/png"),
    }
}

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoProductRepository {
    let db = mongo.database(&builder.database_name());
    let repo = MongoProductRepository::new(&db);
    repo.init_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_read_back() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_create_read");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(input(&builder, "Crème Brûlée Set", 42.5, builder.id("kitchen")))
        .await
        .unwrap();
    assert_eq!(created.slug, "creme-brulee-set");

    let stored = assert_some(repo.get_by_id(created.id).await.unwrap(), "product by id");
    assert_eq!(stored, created);

    let by_slug = assert_some(
        repo.get_by_slug("creme-brulee-set").await.unwrap(),
        "product by slug",
    );
    assert_uuid_eq(by_slug.id, created.id, "slug lookup");
    assert!(by_slug.photo.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_replace_keeps_identity() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_replace");
    let repo = repository(&mongo, &builder).await;
    let category = builder.id("category");

    let created = repo.create(input(&builder, "Old", 10.0, category)).await.unwrap();
    let replaced = repo
        .replace(created.id, input(&builder, "New Name", 12.0, category))
        .await
        .unwrap();

    assert_uuid_eq(replaced.id, created.id, "replaced id");
    assert_eq!(replaced.created_at, created.created_at);
    assert_eq!(replaced.slug, "new-name");

    let missing = repo
        .replace(Uuid::now_v7(), input(&builder, "Ghost", 1.0, category))
        .await;
    assert!(matches!(missing, Err(ProductError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_filters_sorts_and_pages() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_find");
    let repo = repository(&mongo, &builder).await;
    let cat_a = builder.id("a");
    let cat_b = builder.id("b");

    for (i, (name, price, category)) in [
        ("Blue Shirt", 15.0, cat_a),
        ("Red shirt", 60.0, cat_a),
        ("Mug", 20.0, cat_b),
        ("c++ (2e)", 30.0, cat_b),
    ]
    .into_iter()
    .enumerate()
    {
        let mut product = input(&builder, name, price, category);
        product.quantity = i as i64;
        repo.create(product).await.unwrap();
        // Distinct timestamps keep the newest-first order stable
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let filtered = repo
        .find(ProductQuery::all().in_categories(vec![cat_a]).price_between(Some((10.0, 50.0))))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Blue Shirt");
    assert!(filtered[0].photo.is_none());

    let shirts = repo.find(ProductQuery::all().matching("SHIRT")).await.unwrap();
    assert_eq!(shirts.len(), 2);

    // Regex metacharacters in keywords are literal
    let literal = repo.find(ProductQuery::all().matching("c++ (")).await.unwrap();
    assert_eq!(literal.len(), 1);

    let newest = repo
        .find(ProductQuery::all().newest_first().limit(3))
        .await
        .unwrap();
    let stamps: Vec<_> = newest.iter().map(|p| p.created_at).collect();
    assert_eq!(newest.len(), 3);
    assert_descending(&stamps, "created_at");

    let page = repo
        .find(ProductQuery::all().newest_first().skip(1).limit(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_uuid_eq(page[0].id, newest[1].id, "second page");

    let first = &newest[0];
    let related = repo
        .find(ProductQuery::all().in_categories(vec![first.category]).excluding(first.id))
        .await
        .unwrap();
    assert!(related.iter().all(|p| p.id != first.id));

    assert_eq!(repo.estimated_count().await.unwrap(), 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_and_categories() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_delete_categories");
    let db = mongo.database(&builder.database_name());
    let repo = MongoProductRepository::new(&db);

    let shirts = Category {
        id: builder.id("shirts"),
        name: "Shirts".to_string(),
        slug: "shirts".to_string(),
    };
    db.collection::<Category>("categories")
        .insert_one(&shirts)
        .await
        .unwrap();

    let found = assert_some(repo.get_category_by_slug("shirts").await.unwrap(), "category");
    assert_eq!(found, shirts);
    let listed = repo
        .get_categories(vec![shirts.id, builder.id("missing")])
        .await
        .unwrap();
    assert_eq!(listed, vec![shirts.clone()]);

    let product = repo.create(input(&builder, "Tee", 9.0, shirts.id)).await.unwrap();
    assert!(repo.delete(product.id).await.unwrap());
    assert!(!repo.delete(product.id).await.unwrap());
    assert_eq!(
        repo.collection()
            .count_documents(doc! { "_id": product.id.to_string() })
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_paging_is_stable_for_equal_timestamps() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_equal_timestamps");
    let repo = repository(&mongo, &builder).await;
    let category = builder.id("category");

    let first = Product::new(input(&builder, "Twin A", 5.0, category));
    let mut inserted = vec![first.clone()];
    for name in ["Twin B", "Twin C"] {
        let mut product = Product::new(input(&builder, name, 5.0, category));
        product.created_at = first.created_at;
        inserted.push(product);
    }
    for product in &inserted {
        repo.collection().insert_one(product).await.unwrap();
    }

    let mut paged = Vec::new();
    for skip in 0..3 {
        let page = repo
            .find(ProductQuery::all().newest_first().skip(skip).limit(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        paged.push(page[0].id);
    }

    let mut expected: Vec<Uuid> = inserted.iter().map(|p| p.id).collect();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(paged, expected);
}
