//! Extractors that reject with [`AppError`](crate::errors::AppError) so every
//! failure renders the same envelope.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
