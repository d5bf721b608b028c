use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Category, Product, ProductInput, ProductQuery};

/// Storage for products, plus read access to the categories they reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product built from `input`
    async fn create(&self, input: ProductInput) -> ProductResult<Product>;

    /// Full document, photo included
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// First product with this slug, photo excluded
    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>>;

    /// Overwrite every field of an existing product.
    ///
    /// Fails with `NotFound` when `id` does not exist.
    async fn replace(&self, id: Uuid, input: ProductInput) -> ProductResult<Product>;

    /// `true` when a document was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Products matching `query`, photo excluded
    async fn find(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;

    /// Collection size from metadata, without scanning
    async fn estimated_count(&self) -> ProductResult<u64>;

    async fn get_category_by_slug(&self, slug: &str) -> ProductResult<Option<Category>>;

    /// Categories for the given ids; unknown ids are skipped
    async fn get_categories(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Category>>;
}
