//! Router assembly, graceful shutdown and health endpoints.
//!
//! ```ignore
//! let router = create_router::<ApiDoc>(api_routes)
//!     .await?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{DependencyStatus, HealthResponse, ReadyResponse, health_router};
pub use shutdown::ShutdownCoordinator;
