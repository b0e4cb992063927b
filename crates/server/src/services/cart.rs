use std::sync::Arc;

use tracing::info;

use shopcart_core::domain::cart::{ShoppingCart, UserId};
use shopcart_core::domain::product::ProductId;
use shopcart_core::errors::ApplicationError;
use shopcart_db::repositories::{CartMutation, CartRepository};

#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>) -> Self {
        Self { carts }
    }

    pub async fn get_cart(&self, user: &UserId) -> Result<ShoppingCart, ApplicationError> {
        self.carts.find_by_user(user).await?.ok_or(ApplicationError::CartNotFound)
    }

    /// Appends one entry for `product`, creating the cart on first use.
    pub async fn add_item(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<(), ApplicationError> {
        match self.carts.add_product(user, product).await? {
            CartMutation::Applied => {
                info!(
                    event_name = "cart.item.added",
                    user_id = %user,
                    product_id = product.0,
                    "product added to cart"
                );
                Ok(())
            }
            CartMutation::ProductMissing | CartMutation::CartMissing => {
                Err(ApplicationError::ProductNotFound(product))
            }
        }
    }

    /// Removes a single entry for `product`; other duplicates stay in the cart.
    pub async fn remove_item(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<(), ApplicationError> {
        match self.carts.remove_product(user, product).await? {
            CartMutation::Applied => {
                info!(
                    event_name = "cart.item.removed",
                    user_id = %user,
                    product_id = product.0,
                    "product removed from cart"
                );
                Ok(())
            }
            CartMutation::CartMissing => Err(ApplicationError::CartNotFound),
            CartMutation::ProductMissing => Err(ApplicationError::ProductNotInCart(product)),
        }
    }
}
