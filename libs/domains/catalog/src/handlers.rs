//! HTTP handlers for the Catalog API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, PayloadTooLargeResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::form::{ProductForm, ProductUploadForm};
use crate::models::{
    Category, CategoryProductsResponse, CountResponse, MessageResponse, Product,
    ProductDetails, ProductDetailsResponse, ProductFilter, ProductListResponse, ProductPhoto,
    ProductResponse, ProductsResponse, SingleProductResponse,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Cap on request bodies. Photo parts are only buffered up to the photo
/// limit, so anything below this still gets field-ordered validation.
pub const MAX_BODY_BYTES: usize = 200 * 1024 * 1024;

const FALLBACK_PHOTO_TYPE: &str = "application/octet-stream";

/// OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        list_products,
        get_product,
        product_photo,
        delete_product,
        update_product,
        filter_products,
        count_products,
        list_first_page,
        list_page,
        search_products,
        related_products,
        products_by_category,
    ),
    components(
        schemas(
            Product, ProductDetails, Category, ProductPhoto, ProductUploadForm, ProductFilter,
            ProductResponse, ProductListResponse, SingleProductResponse, MessageResponse,
            ProductsResponse, ProductDetailsResponse, CountResponse, CategoryProductsResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            PayloadTooLargeResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Catalog", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/create-product", post(create_product))
        .route("/get-product", get(list_products))
        .route("/get-product/{slug}", get(get_product))
        .route("/product-photo/{pid}", get(product_photo))
        .route("/delete-product/{pid}", delete(delete_product))
        .route("/update-product/{pid}", put(update_product))
        .route("/product-filters", post(filter_products))
        .route("/product-count", get(count_products))
        .route("/product-list", get(list_first_page))
        .route("/product-list/{page}", get(list_page))
        .route("/search/{keyword}", get(search_products))
        .route("/related-product/{pid}/{cid}", get(related_products))
        .route("/product-category/{slug}", get(products_by_category))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(shared_service)
}

/// Create a product from a multipart form
#[utoipa::path(
    post,
    path = "/create-product",
    tag = "Catalog",
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    form: ProductForm,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            message: "Product Created Successfully".to_string(),
            product,
        }),
    ))
}

/// Newest twelve products with their categories
#[utoipa::path(
    get,
    path = "/get-product",
    tag = "Catalog",
    responses(
        (status = 200, description = "Latest products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductListResponse>> {
    let products = service.list_products().await?;
    Ok(Json(ProductListResponse {
        success: true,
        count_total: products.len(),
        message: "All Products".to_string(),
        products,
    }))
}

/// Get a product by slug; `product` is `null` when nothing matches
#[utoipa::path(
    get,
    path = "/get-product/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product or null", body = SingleProductResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(slug): Path<String>,
) -> ProductResult<Json<SingleProductResponse>> {
    let product = service.get_product_by_slug(&slug).await?;
    Ok(Json(SingleProductResponse {
        success: true,
        message: "Single Product Fetched".to_string(),
        product,
    }))
}

/// Raw photo bytes served with the stored content type
#[utoipa::path(
    get,
    path = "/product-photo/{pid}",
    tag = "Catalog",
    params(("pid" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Photo bytes with the stored content type"),
        (status = 204, description = "Product has no photo"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_photo<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Response> {
    let Some(photo) = service.get_photo(id).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let content_type = HeaderValue::from_str(&photo.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_PHOTO_TYPE));
    Ok(([(header::CONTENT_TYPE, content_type)], photo.data).into_response())
}

/// Delete a product; unknown ids succeed too
#[utoipa::path(
    delete,
    path = "/delete-product/{pid}",
    tag = "Catalog",
    params(("pid" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MessageResponse>> {
    service.delete_product(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Product Deleted Successfully".to_string(),
    }))
}

/// Replace every field of a product, photo included
#[utoipa::path(
    put,
    path = "/update-product/{pid}",
    tag = "Catalog",
    params(("pid" = Uuid, Path, description = "Product id")),
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product updated", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    form: ProductForm,
) -> ProductResult<impl IntoResponse> {
    let product = service.update_product(id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            message: "Product Updated Successfully".to_string(),
            product,
        }),
    ))
}

/// Filter by category ids and an inclusive price range
#[utoipa::path(
    post,
    path = "/product-filters",
    tag = "Catalog",
    request_body = ProductFilter,
    responses(
        (status = 200, description = "Matching products", body = ProductsResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(filter): ValidatedJson<ProductFilter>,
) -> ProductResult<Json<ProductsResponse>> {
    let products = service.filter_products(filter).await?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// Estimated number of products
#[utoipa::path(
    get,
    path = "/product-count",
    tag = "Catalog",
    responses(
        (status = 200, description = "Product count", body = CountResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<CountResponse>> {
    let total = service.count_products().await?;
    Ok(Json(CountResponse {
        success: true,
        total,
    }))
}

/// First page of the newest-first listing
#[utoipa::path(
    get,
    path = "/product-list",
    tag = "Catalog",
    responses(
        (status = 200, description = "Page 1", body = ProductsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_first_page<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductsResponse>> {
    page_response(&service, 1).await
}

/// One page of the newest-first listing
#[utoipa::path(
    get,
    path = "/product-list/{page}",
    tag = "Catalog",
    params(("page" = u64, Path, description = "Page number, starting at 1")),
    responses(
        (status = 200, description = "Requested page", body = ProductsResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_page<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(page): Path<String>,
) -> ProductResult<Json<ProductsResponse>> {
    let page = page
        .parse::<u64>()
        .map_err(|_| ProductError::Validation("Page must be a positive integer".to_string()))?;
    page_response(&service, page).await
}

async fn page_response<R: ProductRepository>(
    service: &ProductService<R>,
    page: u64,
) -> ProductResult<Json<ProductsResponse>> {
    let products = service.list_page(page).await?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// Case-insensitive keyword search over name and description
#[utoipa::path(
    get,
    path = "/search/{keyword}",
    tag = "Catalog",
    params(("keyword" = String, Path, description = "Literal text to look for")),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(keyword): Path<String>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.search_products(&keyword).await?;
    Ok(Json(products))
}

/// Up to three other products from the same category
#[utoipa::path(
    get,
    path = "/related-product/{pid}/{cid}",
    tag = "Catalog",
    params(
        ("pid" = Uuid, Path, description = "Product to exclude"),
        ("cid" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Related products", body = ProductDetailsResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn related_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path((pid, cid)): Path<(String, String)>,
) -> ProductResult<Json<ProductDetailsResponse>> {
    let pid = Uuid::parse_str(&pid)?;
    let cid = Uuid::parse_str(&cid)?;

    let products = service.related_products(pid, cid).await?;
    Ok(Json(ProductDetailsResponse {
        success: true,
        products,
    }))
}

/// A category and every product in it
#[utoipa::path(
    get,
    path = "/product-category/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category and its products", body = CategoryProductsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(slug): Path<String>,
) -> ProductResult<Json<CategoryProductsResponse>> {
    let (category, products) = service.products_by_category(&slug).await?;
    Ok(Json(CategoryProductsResponse {
        success: true,
        category,
        products,
    }))
}
