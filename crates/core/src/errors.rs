use thiserror::Error;

use crate::domain::product::{CategoryId, ProductId};
use crate::domain::validation::ValidationErrors;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("product `{0}` not found")]
    ProductNotFound(ProductId),
    #[error("shopping cart not found")]
    CartNotFound,
    #[error("product `{0}` not found in cart")]
    ProductNotInCart(ProductId),
    #[error("no products found for category `{0}`")]
    NoProductsInCategory(CategoryId),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<ValidationErrors> for ApplicationError {
    fn from(value: ValidationErrors) -> Self {
        Self::Domain(DomainError::Validation(value))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, field_errors: Option<ValidationErrors>, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested resource was not found.",
            Self::Unauthorized { .. } => "Authentication is required to access this resource.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Unauthorized { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }

    /// Whether `message` may be shown to the caller verbatim.
    pub fn is_client_facing(&self) -> bool {
        matches!(self, Self::BadRequest { .. } | Self::NotFound { .. } | Self::Unauthorized { .. })
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Unauthorized { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::Validation(errors)) => Self::BadRequest {
                message: "One or more validation errors occurred.".to_owned(),
                field_errors: Some(errors),
                correlation_id: unassigned(),
            },
            ApplicationError::ProductNotFound(_) => Self::NotFound {
                message: "Product not found".to_owned(),
                correlation_id: unassigned(),
            },
            ApplicationError::CartNotFound => Self::NotFound {
                message: "Shopping cart not found".to_owned(),
                correlation_id: unassigned(),
            },
            ApplicationError::ProductNotInCart(_) => Self::NotFound {
                message: "Product not found in cart".to_owned(),
                correlation_id: unassigned(),
            },
            ApplicationError::NoProductsInCategory(_) => Self::NotFound {
                message: "No products found for this category".to_owned(),
                correlation_id: unassigned(),
            },
            ApplicationError::Unauthorized(message) => {
                Self::Unauthorized { message, correlation_id: unassigned() }
            }
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: unassigned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}
