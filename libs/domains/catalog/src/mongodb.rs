//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Category, Product, ProductInput, ProductQuery};
use crate::repository::ProductRepository;

pub const DEFAULT_PRODUCTS_COLLECTION: &str = "products";
pub const DEFAULT_CATEGORIES_COLLECTION: &str = "categories";

pub struct MongoProductRepository {
    products: Collection<Product>,
    categories: Collection<Category>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collections(db, DEFAULT_PRODUCTS_COLLECTION, DEFAULT_CATEGORIES_COLLECTION)
    }

    pub fn with_collections(db: &Database, products: &str, categories: &str) -> Self {
        Self {
            products: db.collection::<Product>(products),
            categories: db.collection::<Category>(categories),
        }
    }

    /// Indexes backing the slug lookup, category listings, price filter and
    /// newest-first sort. Idempotent.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "slug": 1 }, "idx_slug"),
            index(doc! { "category": 1, "created_at": -1 }, "idx_category_created"),
            index(doc! { "price": 1 }, "idx_price"),
            index(doc! { "created_at": -1, "_id": -1 }, "idx_created"),
        ];

        self.products.create_indexes(indexes).await?;
        self.categories
            .create_index(index(doc! { "slug": 1 }, "idx_category_slug"))
            .await?;

        tracing::info!("Catalog indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.products
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }

    fn without_photo() -> Document {
        doc! { "photo": 0 }
    }

    fn build_filter(query: &ProductQuery) -> Document {
        let mut filter = doc! {};

        if !query.categories.is_empty() {
            let ids: Vec<String> = query.categories.iter().map(Uuid::to_string).collect();
            filter.insert("category", doc! { "$in": ids });
        }

        if let Some((min, max)) = query.price_range {
            filter.insert("price", doc! { "$gte": min, "$lte": max });
        }

        if let Some(id) = query.exclude_id {
            filter.insert("_id", doc! { "$ne": id.to_string() });
        }

        // Keywords match literally, never as a pattern
        if let Some(keyword) = &query.keyword {
            let pattern = regex::escape(keyword);
            filter.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": pattern.clone(), "$options": "i" } },
                    doc! { "description": { "$regex": pattern, "$options": "i" } },
                ],
            );
        }

        filter
    }

    fn find_options(query: &ProductQuery) -> FindOptions {
        let mut options = FindOptions::default();
        options.projection = Some(Self::without_photo());
        if query.newest_first {
            // v7 ids order by creation, so equal timestamps still page stably
            options.sort = Some(doc! { "created_at": -1, "_id": -1 });
        }
        options.skip = query.skip;
        options.limit = query.limit;
        options
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let product = Product::new(input);

        self.products.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.products.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>> {
        let product = self
            .products
            .find_one(doc! { "slug": slug })
            .projection(Self::without_photo())
            .await?;
        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn replace(&self, id: Uuid, input: ProductInput) -> ProductResult<Product> {
        let filter = Self::id_filter(id);
        let existing = self
            .products
            .find_one(filter.clone())
            .projection(Self::without_photo())
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let product = existing.replace_with(input);
        let result = self.products.replace_one(filter, &product).await?;
        if result.matched_count == 0 {
            // Deleted between the read and the write
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, slug = %product.slug, "Product replaced");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.products.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn find(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let cursor = self
            .products
            .find(Self::build_filter(&query))
            .with_options(Self::find_options(&query))
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn estimated_count(&self) -> ProductResult<u64> {
        Ok(self.products.estimated_document_count().await?)
    }

    #[instrument(skip(self))]
    async fn get_category_by_slug(&self, slug: &str) -> ProductResult<Option<Category>> {
        let category = self.categories.find_one(doc! { "slug": slug }).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_categories(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let cursor = self.categories.find(doc! { "_id": { "$in": ids } }).await?;
        let categories: Vec<Category> = cursor.try_collect().await?;

        Ok(categories)
    }
}
