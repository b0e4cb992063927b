pub mod config;
pub mod domain;
pub mod errors;
pub mod identity;

pub use domain::cart::{CartId, ShoppingCart, UserId};
pub use domain::product::{CategoryId, NewProduct, Product, ProductDraft, ProductId};
pub use domain::validation::ValidationErrors;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use identity::{issue_token, IdentityError, IdentityVerifier};
