use async_trait::async_trait;
use thiserror::Error;

use shopcart_core::domain::cart::{ShoppingCart, UserId};
use shopcart_core::domain::product::{CategoryId, NewProduct, Product, ProductId};
use shopcart_core::errors::ApplicationError;

pub mod cart;
pub mod memory;
pub mod product;

pub use cart::SqlCartRepository;
pub use memory::{InMemoryCartRepository, InMemoryProductRepository};
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Persistence(value.to_string())
    }
}

/// Outcome of a cart mutation. Misses are reported as values, not errors,
/// so callers can map each one to its own not-found signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartMutation {
    Applied,
    CartMissing,
    ProductMissing,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, or only those in `category`, ordered by id.
    async fn list(&self, category: Option<CategoryId>) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart with its products eagerly loaded in insertion order.
    async fn find_by_user(&self, user: &UserId) -> Result<Option<ShoppingCart>, RepositoryError>;

    /// Appends one entry for `product`, creating the cart if the user has none.
    /// Returns `ProductMissing` without creating anything when the product does not exist.
    async fn add_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError>;

    /// Removes the oldest entry for `product`. `ProductMissing` means the cart
    /// holds no such entry.
    async fn remove_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError>;
}
