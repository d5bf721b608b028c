use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::slug::slugify;

/// Ids are stored as hyphenated strings in both BSON and JSON.
pub(crate) mod uuid_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.hyphenated().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

/// Fixed-width RFC 3339 with microseconds, so string order is time order.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

/// Photo bytes are BSON binary in the database and base64 text in JSON.
pub(crate) mod photo_data {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use mongodb::bson::{Binary, spec::BinarySubtype};
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&BASE64.encode(bytes))
        } else {
            Binary {
                subtype: BinarySubtype::Generic,
                bytes: bytes.to_vec(),
            }
            .serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let raw = String::deserialize(deserializer)?;
            BASE64.decode(raw).map_err(D::Error::custom)
        } else {
            Binary::deserialize(deserializer).map(|binary| binary.bytes)
        }
    }
}

/// Product category; owned by another service, only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Image stored inline on the product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPhoto {
    /// Base64 in JSON responses
    #[serde(with = "photo_data")]
    #[schema(value_type = String, format = Byte)]
    pub data: Vec<u8>,
    /// MIME type reported by the uploader, e.g. `image/png`
    pub content_type: String,
}

impl ProductPhoto {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data: bytes,
            content_type: content_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Product document as stored in the `products` collection.
///
/// `photo` is `None` whenever the document was read with the photo projected
/// out, which is every read except [`ProductRepository::get_by_id`].
///
/// [`ProductRepository::get_by_id`]: crate::repository::ProductRepository::get_by_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    pub id: Uuid,
    pub name: String,
    /// Derived from `name` on every write
    pub slug: String,
    pub description: String,
    pub price: f64,
    /// Id of the owning [`Category`]
    #[serde(with = "uuid_string")]
    pub category: Uuid,
    pub quantity: i64,
    #[serde(default)]
    pub shipping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<ProductPhoto>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Product {
    pub fn new(input: ProductInput) -> Self {
        let now = now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            quantity: input.quantity,
            shipping: input.shipping,
            photo: Some(input.photo),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every field from `input`, keeping `id` and `created_at`.
    pub fn replace_with(self, input: ProductInput) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            updated_at: now(),
            ..Self::new(input)
        }
    }

    pub fn without_photo(mut self) -> Self {
        self.photo = None;
        self
    }
}

/// Product with its category resolved; never carries the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    /// `null` when the referenced category no longer exists
    pub category: Option<Category>,
    pub quantity: i64,
    pub shipping: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ProductDetails {
    pub fn new(product: Product, category: Option<Category>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            category,
            quantity: product.quantity,
            shipping: product.shipping,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Validated create/update payload produced by [`ProductForm::validate`].
///
/// [`ProductForm::validate`]: crate::form::ProductForm::validate
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Uuid,
    pub quantity: i64,
    pub shipping: bool,
    pub photo: ProductPhoto,
}

/// Body of `POST /product-filters`.
///
/// Both lists may be empty; an empty filter matches every product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductFilter {
    /// Category ids; a product matches when its category is any of them
    #[serde(default)]
    pub checked: Vec<Uuid>,
    /// Empty, or `[min, max]` inclusive price bounds
    #[serde(default)]
    #[validate(custom(function = "validate_price_range"))]
    pub radio: Vec<f64>,
}

impl ProductFilter {
    pub fn price_range(&self) -> Option<(f64, f64)> {
        match self.radio.as_slice() {
            [min, max] => Some((*min, *max)),
            _ => None,
        }
    }
}

fn validate_price_range(radio: &[f64]) -> Result<(), ValidationError> {
    match radio {
        [] => Ok(()),
        [min, max] if min.is_finite() && max.is_finite() && min <= max => Ok(()),
        _ => Err(ValidationError::new("price_range")
            .with_message("radio must be empty or [min, max] with min <= max".into())),
    }
}

/// Read query against the products collection.
///
/// Every read through [`ProductRepository::find`] leaves the photo out.
///
/// [`ProductRepository::find`]: crate::repository::ProductRepository::find
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub categories: Vec<Uuid>,
    pub price_range: Option<(f64, f64)>,
    /// Case-insensitive literal substring of name or description
    pub keyword: Option<String>,
    pub exclude_id: Option<Uuid>,
    pub newest_first: bool,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl ProductQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_categories(mut self, categories: Vec<Uuid>) -> Self {
        self.categories = categories;
        self
    }

    pub fn price_between(mut self, range: Option<(f64, f64)>) -> Self {
        self.price_range = range;
        self
    }

    pub fn matching(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

// Response envelopes. Field names are part of the public contract.

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    /// Number of products in this response, not in the collection
    #[serde(rename = "counTotal")]
    pub count_total: usize,
    pub message: String,
    pub products: Vec<ProductDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SingleProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Option<ProductDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailsResponse {
    pub success: bool,
    pub products: Vec<ProductDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub success: bool,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProductsResponse {
    pub success: bool,
    pub category: Option<Category>,
    pub products: Vec<ProductDetails>,
}
