use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use shopcart_core::domain::cart::UserId;
use shopcart_core::errors::ApplicationError;
use shopcart_core::identity::IdentityVerifier;

use super::ApiError;

/// The authenticated caller, resolved from the bearer token's `email` claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<IdentityVerifier>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<IdentityVerifier>::from_ref(state);
        let header = parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());

        verifier.resolve_header(header).map(CurrentUser).map_err(|error| {
            warn!(
                event_name = "api.identity.rejected",
                path = %parts.uri.path(),
                error = %error,
                "request carried no usable identity"
            );
            ApiError::from(ApplicationError::Unauthorized(error.to_string()))
        })
    }
}
