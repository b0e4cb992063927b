use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use shopcart_core::domain::product::{CategoryId, Product, ProductDraft, ProductId};

use super::extract::CurrentUser;
use super::{path_id, ApiError, ApiState};

pub async fn list_products(
    State(state): State<ApiState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.list_all().await?))
}

pub async fn get_product(
    State(state): State<ApiState>,
    _user: CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = path_id(id, "id")?;
    Ok(Json(state.catalog.find(ProductId(id)).await?))
}

pub async fn list_by_category(
    State(state): State<ApiState>,
    _user: CurrentUser,
    category_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let category_id = path_id(category_id, "categoryId")?;
    Ok(Json(state.catalog.list_by_category(CategoryId(category_id)).await?))
}

pub async fn create_product(
    State(state): State<ApiState>,
    _user: CurrentUser,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) =
        payload.map_err(|rejection| ApiError::invalid("body", rejection.body_text()))?;

    let product = state.catalog.create(draft).await?;
    let location = format!("/Product/{}", product.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)))
}
