//! Wires the catalog domain to the configured collections.

use axum::Router;
use domain_catalog::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

fn repository(state: &AppState) -> MongoProductRepository {
    let catalog = &state.config.catalog;
    MongoProductRepository::with_collections(
        &state.db,
        &catalog.products_collection,
        &catalog.categories_collection,
    )
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}

pub fn router(state: &AppState) -> Router {
    handlers::router(ProductService::new(repository(state)))
}
