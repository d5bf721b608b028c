//! In-memory repository for handler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_catalog::*;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    categories: Mutex<Vec<Category>>,
}

impl InMemoryProductRepository {
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            categories: Mutex::new(categories),
        }
    }

    fn matches(product: &Product, query: &ProductQuery) -> bool {
        if !query.categories.is_empty() && !query.categories.contains(&product.category) {
            return false;
        }
        if let Some((min, max)) = query.price_range {
            if product.price < min || product.price > max {
                return false;
            }
        }
        if query.exclude_id == Some(product.id) {
            return false;
        }
        if let Some(keyword) = &query.keyword {
            let keyword = keyword.to_lowercase();
            if !product.name.to_lowercase().contains(&keyword)
                && !product.description.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .map(Product::without_photo))
    }

    async fn replace(&self, id: Uuid, input: ProductInput) -> ProductResult<Product> {
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProductError::NotFound(id))?;
        let replaced = slot.clone().replace_with(input);
        *slot = replaced.clone();
        Ok(replaced)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn find(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let products = self.products.lock().unwrap();
        let mut found: Vec<Product> = products
            .iter()
            .filter(|p| Self::matches(p, &query))
            .cloned()
            .map(Product::without_photo)
            .collect();

        if query.newest_first {
            found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        }

        let skip = query.skip.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(skip).take(limit).collect())
    }

    async fn estimated_count(&self) -> ProductResult<u64> {
        Ok(self.products.lock().unwrap().len() as u64)
    }

    async fn get_category_by_slug(&self, slug: &str) -> ProductResult<Option<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn get_categories(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

pub fn category(id: Uuid, name: &str, slug: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

pub const BOUNDARY: &str = "catalog-test-boundary";

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"photo\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub fn content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Every field of a valid product form.
pub fn product_form(name: &str, price: &str, category: Uuid, photo: &[u8]) -> Vec<u8> {
    MultipartBody::new()
        .text("name", name)
        .text("description", &format!("{name} description"))
        .text("price", price)
        .text("category", &category.to_string())
        .text("quantity", "10")
        .text("shipping", "true")
        .file("photo", "image/png", photo)
        .finish()
}
