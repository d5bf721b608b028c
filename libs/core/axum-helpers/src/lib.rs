//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`errors`]**: [`AppError`] and the `{success: false, code, error, message}` envelope
//! - **[`extractors`]**: [`UuidPath`] and [`ValidatedJson`], rejecting with [`AppError`]
//! - **[`server`]**: router assembly with OpenAPI viewers, health, graceful shutdown
//! - **[`http`]**: CORS and security header layers

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    DependencyStatus, HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router,
};

pub use http::{create_cors_layer, parse_allowed_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
