//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog backed by MongoDB: CRUD, photos, filtering, paging and search",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/product", api = domain_catalog::ApiDoc)
    ),
    tags(
        (name = "Catalog", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;
