//! Bearer-token identity.
//!
//! Callers present an HS256-signed JWT. The `email` claim is the one and only
//! source of the cart owner's [`UserId`]; subject identifiers are ignored.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::domain::cart::UserId;

pub const IDENTITY_CLAIM: &str = "email";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("missing Authorization header")]
    MissingCredentials,
    #[error("authorization scheme must be Bearer")]
    InvalidScheme,
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token does not carry an `{IDENTITY_CLAIM}` claim")]
    MissingIdentityClaim,
    #[error("token could not be issued: {0}")]
    Issue(String),
}

/// Verifies bearer tokens and resolves them to a [`UserId`].
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier").finish_non_exhaustive()
    }
}

impl IdentityVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        let key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());
        Self { key, validation }
    }

    /// Resolves the value of an `Authorization` header.
    pub fn resolve_header(&self, header: Option<&str>) -> Result<UserId, IdentityError> {
        let header = header.ok_or(IdentityError::MissingCredentials)?;
        let (scheme, token) =
            header.trim().split_once(' ').ok_or(IdentityError::InvalidScheme)?;
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return Err(IdentityError::InvalidScheme);
        }
        self.resolve_token(token.trim())
    }

    pub fn resolve_token(&self, token: &str) -> Result<UserId, IdentityError> {
        let data = decode::<IdentityClaims>(token, &self.key, &self.validation).map_err(
            |error| match error.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::InvalidToken(error.to_string()),
            },
        )?;

        data.claims
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .map(UserId)
            .ok_or(IdentityError::MissingIdentityClaim)
    }
}

/// Mints a token for `email` that [`IdentityVerifier`] built from the same
/// config will accept.
pub fn issue_token(
    config: &AuthConfig,
    email: &str,
    ttl_secs: u64,
) -> Result<String, IdentityError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(IdentityError::MissingIdentityClaim);
    }

    let now = Utc::now().timestamp();
    let ttl = i64::try_from(ttl_secs).map_err(|_| IdentityError::Issue("ttl too large".into()))?;
    let claims = IdentityClaims {
        email: Some(email.to_string()),
        sub: None,
        exp: now.saturating_add(ttl),
        iat: now,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|error| IdentityError::Issue(error.to_string()))
}
