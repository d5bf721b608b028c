//! Multipart form accepted by the create and update endpoints.

use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{ProductInput, ProductPhoto};

/// Largest accepted photo, in bytes
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

const PHOTO_ERROR: &str = "Photo is required and should be less than 1MB";
const DEFAULT_PHOTO_TYPE: &str = "application/octet-stream";

/// File part of the form
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Raw form fields as received; nothing is checked until [`validate`](Self::validate).
///
/// Only the fields below are accepted. Any other part rejects the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub shipping: Option<String>,
    pub photo: Option<PhotoUpload>,
}

/// OpenAPI description of the multipart body
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductUploadForm {
    name: String,
    description: String,
    /// Decimal number
    price: String,
    /// Category id
    #[schema(format = Uuid)]
    category: String,
    /// Integer
    quantity: String,
    /// `true`/`false`, `1`/`0` or `yes`/`no`; defaults to `false`
    shipping: Option<String>,
    /// At most 1,000,000 bytes
    #[schema(value_type = String, format = Binary)]
    photo: Vec<u8>,
}

impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;
        let mut form = ProductForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "photo" => {
                    let content_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_PHOTO_TYPE)
                        .to_string();
                    let bytes = read_capped(field).await?;
                    // Browsers send an empty part when no file was chosen
                    form.photo = (!bytes.is_empty()).then(|| PhotoUpload {
                        bytes,
                        content_type,
                    });
                }
                "name" => form.name = Some(field.text().await?),
                "description" => form.description = Some(field.text().await?),
                "price" => form.price = Some(field.text().await?),
                "category" => form.category = Some(field.text().await?),
                "quantity" => form.quantity = Some(field.text().await?),
                "shipping" => form.shipping = Some(field.text().await?),
                other => {
                    return Err(ProductError::Upload(format!("Unexpected field '{}'", other)));
                }
            }
        }

        Ok(form)
    }
}

/// Buffer at most `MAX_PHOTO_BYTES + 1` bytes of a file part and drain the
/// rest, so an oversized photo still reaches validation in field order.
async fn read_capped(mut field: Field<'_>) -> ProductResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        let room = (MAX_PHOTO_BYTES + 1).saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(bytes)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, label: &str) -> ProductResult<&'a str> {
    present(value).ok_or_else(|| ProductError::Validation(format!("{} is required", label)))
}

fn parse_shipping(raw: Option<&str>) -> ProductResult<bool> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(_) => Err(ProductError::Validation(
            "Shipping must be true or false".to_string(),
        )),
    }
}

impl ProductForm {
    /// Check presence of every field in order name, description, price,
    /// category, quantity, photo, then parse the values.
    ///
    /// The first failure wins. A missing photo and an oversized photo share
    /// one message.
    pub fn validate(self) -> ProductResult<ProductInput> {
        let name = required(&self.name, "Name")?;
        let description = required(&self.description, "Description")?;
        let price = required(&self.price, "Price")?;
        let category = required(&self.category, "Category")?;
        let quantity = required(&self.quantity, "Quantity")?;
        let photo = self
            .photo
            .as_ref()
            .filter(|photo| photo.bytes.len() <= MAX_PHOTO_BYTES)
            .ok_or_else(|| ProductError::Validation(PHOTO_ERROR.to_string()))?;

        let price = price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| ProductError::Validation("Price must be a number".to_string()))?;
        let category = Uuid::parse_str(category)
            .map_err(|_| ProductError::Validation("Category must be a valid id".to_string()))?;
        let quantity = quantity
            .parse::<i64>()
            .map_err(|_| ProductError::Validation("Quantity must be a whole number".to_string()))?;
        let shipping = parse_shipping(present(&self.shipping))?;

        Ok(ProductInput {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category,
            quantity,
            shipping,
            photo: ProductPhoto::new(photo.bytes.clone(), photo.content_type.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ProductForm {
        ProductForm {
            name: Some("Blue Shirt".into()),
            description: Some("Soft cotton".into()),
            price: Some("19.99".into()),
            category: Some(Uuid::now_v7().to_string()),
            quantity: Some("4".into()),
            shipping: None,
            photo: Some(PhotoUpload {
                bytes: vec![0xFF, 0xD8, 0xFF],
                content_type: "image/jpeg".into(),
            }),
        }
    }

    fn message(form: ProductForm) -> String {
        match form.validate() {
            Err(ProductError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_complete_form() {
        let form = complete();
        let category = form.category.clone().unwrap();
        let input = form.validate().unwrap();

        assert_eq!(input.name, "Blue Shirt");
        assert_eq!(input.price, 19.99);
        assert_eq!(input.category.to_string(), category);
        assert_eq!(input.quantity, 4);
        assert!(!input.shipping);
        assert_eq!(input.photo.content_type, "image/jpeg");
        assert_eq!(input.photo.bytes(), &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_validate_reports_first_missing_field_in_order() {
        assert_eq!(message(ProductForm::default()), "Name is required");

        let form = ProductForm { description: None, price: None, ..complete() };
        assert_eq!(message(form), "Description is required");

        let form = ProductForm { price: Some("   ".into()), category: None, ..complete() };
        assert_eq!(message(form), "Price is required");

        let form = ProductForm { category: None, quantity: None, photo: None, ..complete() };
        assert_eq!(message(form), "Category is required");

        let form = ProductForm { quantity: Some(String::new()), photo: None, ..complete() };
        assert_eq!(message(form), "Quantity is required");
    }

    #[test]
    fn test_validate_photo_missing_or_too_large() {
        let form = ProductForm { photo: None, ..complete() };
        assert_eq!(message(form), PHOTO_ERROR);

        let form = ProductForm {
            photo: Some(PhotoUpload {
                bytes: vec![0; MAX_PHOTO_BYTES + 1],
                content_type: "image/png".into(),
            }),
            ..complete()
        };
        assert_eq!(message(form), PHOTO_ERROR);
    }

    #[test]
    fn test_validate_accepts_photo_at_limit() {
        let form = ProductForm {
            photo: Some(PhotoUpload {
                bytes: vec![0; MAX_PHOTO_BYTES],
                content_type: "image/png".into(),
            }),
            ..complete()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_presence_is_checked_before_parsing() {
        let form = ProductForm { price: Some("cheap".into()), photo: None, ..complete() };
        assert_eq!(message(form), PHOTO_ERROR);
    }

    #[test]
    fn test_validate_rejects_unparseable_values() {
        let form = ProductForm { price: Some("cheap".into()), ..complete() };
        assert_eq!(message(form), "Price must be a number");

        let form = ProductForm { price: Some("NaN".into()), ..complete() };
        assert_eq!(message(form), "Price must be a number");

        let form = ProductForm { category: Some("shirts".into()), ..complete() };
        assert_eq!(message(form), "Category must be a valid id");

        let form = ProductForm { quantity: Some("2.5".into()), ..complete() };
        assert_eq!(message(form), "Quantity must be a whole number");

        let form = ProductForm { shipping: Some("maybe".into()), ..complete() };
        assert_eq!(message(form), "Shipping must be true or false");
    }

    #[test]
    fn test_parse_shipping_variants() {
        assert!(!parse_shipping(None).unwrap());
        assert!(parse_shipping(Some("1")).unwrap());
        assert!(parse_shipping(Some("TRUE")).unwrap());
        assert!(!parse_shipping(Some("no")).unwrap());
    }
}
