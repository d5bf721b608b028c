use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    /// Missing or malformed field; the message is shown to the client as is
    #[error("{0}")]
    Validation(String),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => AppError::InvalidInput(msg),
            ProductError::Upload(msg) => AppError::InvalidMultipart(msg),
            ProductError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            ProductError::InvalidId(e) => AppError::UuidError(e),
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Database(e) => AppError::Database(e),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<MultipartError> for ProductError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProductError::PayloadTooLarge(err.body_text())
        } else {
            ProductError::Upload(err.body_text())
        }
    }
}

impl From<MultipartRejection> for ProductError {
    fn from(rejection: MultipartRejection) -> Self {
        ProductError::Upload(rejection.body_text())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Internal(err.to_string())
    }
}
