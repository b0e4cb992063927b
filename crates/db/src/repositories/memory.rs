use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use shopcart_core::domain::cart::{CartId, ShoppingCart, UserId};
use shopcart_core::domain::product::{CategoryId, NewProduct, Product, ProductId};

use super::{CartMutation, CartRepository, ProductRepository, RepositoryError};

#[derive(Default)]
struct ProductState {
    last_id: i64,
    products: BTreeMap<ProductId, Product>,
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    state: RwLock<ProductState>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, category: Option<CategoryId>) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|product| category.is_none() || product.category_id == category)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let product = product.into_product(ProductId(state.last_id));
        state.products.insert(product.id, product.clone());
        Ok(product)
    }
}

#[derive(Default)]
struct CartState {
    last_id: i64,
    carts: HashMap<UserId, ShoppingCart>,
}

/// Carts held in memory, resolving products against a shared product store.
pub struct InMemoryCartRepository {
    products: Arc<InMemoryProductRepository>,
    state: RwLock<CartState>,
}

impl InMemoryCartRepository {
    pub fn new(products: Arc<InMemoryProductRepository>) -> Self {
        Self { products, state: RwLock::default() }
    }
}

#[async_trait::async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user: &UserId) -> Result<Option<ShoppingCart>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.carts.get(user).cloned())
    }

    async fn add_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError> {
        // Held across the lookup so a first add cannot race another into two carts.
        let mut state = self.state.write().await;
        let Some(product) = self.products.find_by_id(product).await? else {
            return Ok(CartMutation::ProductMissing);
        };

        let CartState { last_id, carts } = &mut *state;
        carts
            .entry(user.clone())
            .or_insert_with(|| {
                *last_id += 1;
                ShoppingCart::new(CartId(*last_id), user.clone())
            })
            .push(product);
        Ok(CartMutation::Applied)
    }

    async fn remove_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(cart) = state.carts.get_mut(user) else {
            return Ok(CartMutation::CartMissing);
        };

        if cart.remove_one(product) {
            Ok(CartMutation::Applied)
        } else {
            Ok(CartMutation::ProductMissing)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use shopcart_core::domain::cart::UserId;
    use shopcart_core::domain::product::{CategoryId, NewProduct, ProductId};

    use crate::repositories::{
        CartMutation, CartRepository, InMemoryCartRepository, InMemoryProductRepository,
        ProductRepository,
    };

    fn new_product(name: &str, category: Option<i64>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Decimal::new(500, 2),
            description: None,
            category_id: category.map(CategoryId),
        }
    }

    #[tokio::test]
    async fn in_memory_products_get_sequential_ids_and_filter_by_category() {
        let repo = InMemoryProductRepository::default();
        let first = repo.insert(new_product("First", Some(1))).await.expect("insert");
        let second = repo.insert(new_product("Second", Some(2))).await.expect("insert");

        assert_eq!(first.id, ProductId(1));
        assert_eq!(second.id, ProductId(2));
        assert_eq!(repo.list(Some(CategoryId(2))).await.expect("list"), vec![second]);
        assert_eq!(repo.list(None).await.expect("list").len(), 2);
        assert_eq!(repo.find_by_id(ProductId(9)).await.expect("find"), None);
    }

    #[tokio::test]
    async fn in_memory_cart_matches_sql_semantics() {
        let products = Arc::new(InMemoryProductRepository::default());
        let widget = products.insert(new_product("Widget", None)).await.expect("insert");
        let carts = InMemoryCartRepository::new(Arc::clone(&products));
        let user = UserId("alice@example.com".to_string());

        assert_eq!(
            carts.add_product(&user, ProductId(99)).await.expect("add"),
            CartMutation::ProductMissing
        );
        assert_eq!(carts.find_by_user(&user).await.expect("find"), None);
        assert_eq!(
            carts.remove_product(&user, widget.id).await.expect("remove"),
            CartMutation::CartMissing
        );

        carts.add_product(&user, widget.id).await.expect("add");
        carts.add_product(&user, widget.id).await.expect("add");
        let cart = carts.find_by_user(&user).await.expect("find").expect("cart exists");
        assert_eq!(cart.products, vec![widget.clone(), widget.clone()]);

        carts.remove_product(&user, widget.id).await.expect("remove");
        carts.remove_product(&user, widget.id).await.expect("remove");
        assert_eq!(
            carts.remove_product(&user, widget.id).await.expect("remove"),
            CartMutation::ProductMissing
        );
    }
}
