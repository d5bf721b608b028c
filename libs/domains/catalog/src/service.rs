//! Product Service - Business logic layer

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::form::ProductForm;
use crate::models::{Category, Product, ProductDetails, ProductFilter, ProductPhoto, ProductQuery};
use crate::repository::ProductRepository;

/// Products returned by the unpaged listing
pub const LIST_LIMIT: i64 = 12;
/// Products per page of `/product-list`
pub const PAGE_SIZE: u64 = 1;
/// Last page whose offset still fits the driver's signed skip
pub const MAX_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE + 1;
/// Products returned by the related lookup
pub const RELATED_LIMIT: i64 = 3;

/// Catalog operations on top of a [`ProductRepository`].
///
/// Validates uploaded forms, translates requests into repository queries and
/// resolves category references for the read models.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the form and insert a new product
    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: ProductForm) -> ProductResult<Product> {
        let input = form.validate()?;
        self.repository.create(input).await
    }

    /// Validate the form and overwrite every field of product `id`
    #[instrument(skip(self, form))]
    pub async fn update_product(&self, id: Uuid, form: ProductForm) -> ProductResult<Product> {
        let input = form.validate()?;
        self.repository.replace(id, input).await
    }

    /// Newest products with their categories
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductDetails>> {
        let products = self
            .repository
            .find(ProductQuery::all().newest_first().limit(LIST_LIMIT))
            .await?;
        self.populate(products).await
    }

    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> ProductResult<Option<ProductDetails>> {
        let Some(product) = self.repository.get_by_slug(slug).await? else {
            return Ok(None);
        };
        let details = self.populate(vec![product]).await?;
        Ok(details.into_iter().next())
    }

    /// Stored photo of product `id`; `None` when the product has none
    #[instrument(skip(self))]
    pub async fn get_photo(&self, id: Uuid) -> ProductResult<Option<ProductPhoto>> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        Ok(product.photo)
    }

    /// Remove product `id`. Deleting an unknown id is not an error.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            tracing::debug!(product_id = %id, "Delete matched no product");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn filter_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        filter
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let query = ProductQuery::all()
            .in_categories(filter.checked.clone())
            .price_between(filter.price_range());
        self.repository.find(query).await
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self) -> ProductResult<u64> {
        self.repository.estimated_count().await
    }

    /// One page of the newest-first listing; pages start at 1
    #[instrument(skip(self))]
    pub async fn list_page(&self, page: u64) -> ProductResult<Vec<Product>> {
        if page == 0 {
            return Err(ProductError::Validation("Page must be at least 1".to_string()));
        }
        // The driver encodes skip as a signed 64-bit integer
        if page > MAX_PAGE {
            return Err(ProductError::Validation(format!("Page must be at most {}", MAX_PAGE)));
        }

        let query = ProductQuery::all()
            .newest_first()
            .skip((page - 1) * PAGE_SIZE)
            .limit(PAGE_SIZE as i64);
        self.repository.find(query).await
    }

    #[instrument(skip(self))]
    pub async fn search_products(&self, keyword: &str) -> ProductResult<Vec<Product>> {
        self.repository.find(ProductQuery::all().matching(keyword)).await
    }

    /// Other products in category `category_id`, never `product_id` itself
    #[instrument(skip(self))]
    pub async fn related_products(
        &self,
        product_id: Uuid,
        category_id: Uuid,
    ) -> ProductResult<Vec<ProductDetails>> {
        let query = ProductQuery::all()
            .in_categories(vec![category_id])
            .excluding(product_id)
            .limit(RELATED_LIMIT);
        let products = self.repository.find(query).await?;
        self.populate(products).await
    }

    /// Category with this slug and every product referencing it
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        slug: &str,
    ) -> ProductResult<(Option<Category>, Vec<ProductDetails>)> {
        let Some(category) = self.repository.get_category_by_slug(slug).await? else {
            return Ok((None, Vec::new()));
        };

        let products = self
            .repository
            .find(ProductQuery::all().in_categories(vec![category.id]))
            .await?;
        let details = products
            .into_iter()
            .map(|product| ProductDetails::new(product, Some(category.clone())))
            .collect();

        Ok((Some(category), details))
    }

    /// Resolve category references with a single lookup
    async fn populate(&self, products: Vec<Product>) -> ProductResult<Vec<ProductDetails>> {
        let mut ids: Vec<Uuid> = products.iter().map(|p| p.category).collect();
        ids.sort_unstable();
        ids.dedup();

        let categories: HashMap<Uuid, Category> = self
            .repository
            .get_categories(ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let category = categories.get(&product.category).cloned();
                ProductDetails::new(product, category)
            })
            .collect())
    }
}
