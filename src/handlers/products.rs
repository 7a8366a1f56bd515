use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    handlers::{
        extract::{ApiQuery, ProductId},
        require_content_type, JSON_CONTENT_TYPE,
    },
    models::{Product, ProductFilters, ProductPayload, ProductQuery},
    AppState,
};

fn location_of(product: &Product) -> String {
    format!("/products/{}", product.id)
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    info!("Request to create a product");
    require_content_type(&headers, JSON_CONTENT_TYPE)?;

    let payload = ProductPayload::from_json(&body)?;
    info!(name = %payload.name, category = %payload.category, "Processing product");

    let product = state.store.create(&payload).await?;
    info!(id = product.id, "Product saved");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location_of(&product))],
        Json(product),
    ))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<ProductFilters>,
) -> AppResult<Json<Vec<Product>>> {
    let query = ProductQuery::try_from(filters)?;
    info!(query = ?query, "Listing products");

    let products = state.store.list(&query).await?;
    info!(count = products.len(), "Products returned");

    Ok(Json(products))
}

// ── Read ──────────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    info!(id, name = %product.name, "Fetched product");
    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Product>> {
    info!(id, "Request to update a product");
    require_content_type(&headers, JSON_CONTENT_TYPE)?;

    let mut product = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    info!(id, name = %product.name, "Updating product");

    product.apply(ProductPayload::from_json(&body)?);
    product.id = id;
    let product = state.store.update(&product).await?;

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<StatusCode> {
    let product = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    info!(id, name = %product.name, "Deleting product");
    state.store.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
