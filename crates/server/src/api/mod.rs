//! HTTP routes for the catalog and the caller's shopping cart.
//!
//! Every route requires a bearer token; see [`extract::CurrentUser`].

pub mod cart;
pub mod extract;
pub mod products;

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRef, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use shopcart_core::domain::validation::ValidationErrors;
use shopcart_core::errors::{ApplicationError, InterfaceError};
use shopcart_core::identity::IdentityVerifier;

use crate::services::{CartService, CatalogService};

#[derive(Clone)]
pub struct ApiState {
    pub catalog: CatalogService,
    pub carts: CartService,
    pub identity: Arc<IdentityVerifier>,
}

impl FromRef<ApiState> for Arc<IdentityVerifier> {
    fn from_ref(state: &ApiState) -> Self {
        Arc::clone(&state.identity)
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/Product", get(products::list_products).post(products::create_product))
        .route("/Product/{id}", get(products::get_product))
        .route("/Product/ByCategory/{category_id}", get(products::list_by_category))
        .route("/ShoppingCart", get(cart::get_cart))
        .route("/ShoppingCart/AddItem/{product_id}", post(cart::add_item))
        .route("/ShoppingCart/RemoveItem/{product_id}", post(cart::remove_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: &str) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Numeric path segment, or a validation error on `field` when it does not parse.
pub(crate) fn path_id(
    segment: Result<Path<i64>, PathRejection>,
    field: &str,
) -> Result<i64, ApiError> {
    segment
        .map(|Path(id)| id)
        .map_err(|rejection| ApiError::invalid(field, rejection.body_text()))
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    correlation_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

/// An [`InterfaceError`] tagged with a fresh correlation id, rendered as JSON.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error.into_interface(Uuid::new_v4().to_string()))
    }
}

impl ApiError {
    /// A 400 carrying a single field error.
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::from(ApplicationError::from(ValidationErrors::single(field, reason)))
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let correlation_id = self.0.correlation_id();

        let (message, errors) = match &self.0 {
            InterfaceError::BadRequest { message, field_errors, .. } => {
                (message.as_str(), field_errors.as_ref())
            }
            InterfaceError::NotFound { message, .. }
            | InterfaceError::Unauthorized { message, .. } => (message.as_str(), None),
            InterfaceError::ServiceUnavailable { message, .. }
            | InterfaceError::Internal { message, .. } => {
                error!(
                    event_name = "api.request.failed",
                    correlation_id,
                    status = status.as_u16(),
                    error = %message,
                    "request failed"
                );
                (self.0.user_message(), None)
            }
        };

        if self.0.is_client_facing() {
            info!(
                event_name = "api.request.rejected",
                correlation_id,
                status = status.as_u16(),
                reason = message,
                "request rejected"
            );
        }

        (status, Json(ErrorBody { error: message, correlation_id, errors })).into_response()
    }
}
