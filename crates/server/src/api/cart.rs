use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use shopcart_core::domain::product::{Product, ProductId};

use super::extract::CurrentUser;
use super::{path_id, ActionResponse, ApiError, ApiState};

/// Items of the caller's cart, oldest entry first.
pub async fn get_cart(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    let cart = state.carts.get_cart(&user).await?;
    Ok(Json(cart.products))
}

pub async fn add_item(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let product_id = path_id(product_id, "productId")?;
    state.carts.add_item(&user, ProductId(product_id)).await?;
    Ok(Json(ActionResponse::ok("Product added to cart")))
}

pub async fn remove_item(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let product_id = path_id(product_id, "productId")?;
    state.carts.remove_item(&user, ProductId(product_id)).await?;
    Ok(Json(ActionResponse::ok("Product removed from cart")))
}
