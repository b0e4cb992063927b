use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub i64);

/// Identity of a cart owner, as resolved from the caller's credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's cart. `products` is an ordered multiset: one entry per add,
/// oldest first, so the same product may appear more than once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub id: CartId,
    pub user: UserId,
    pub products: Vec<Product>,
}

impl ShoppingCart {
    pub fn new(id: CartId, user: UserId) -> Self {
        Self { id, user, products: Vec::new() }
    }

    pub fn push(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Removes the first entry for `product_id`. Returns false when none matched.
    pub fn remove_one(&mut self, product_id: ProductId) -> bool {
        match self.products.iter().position(|product| product.id == product_id) {
            Some(index) => {
                self.products.remove(index);
                true
            }
            None => false,
        }
    }
}
