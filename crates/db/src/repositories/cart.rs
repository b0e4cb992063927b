use chrono::Utc;
use tracing::debug;

use shopcart_core::domain::cart::{CartId, ShoppingCart, UserId};
use shopcart_core::domain::product::ProductId;

use super::product::{product_from_row, PRODUCT_COLUMNS};
use super::{CartMutation, CartRepository, RepositoryError};
use crate::DbPool;

/// Cart mutations read before they write, so they take the write lock up
/// front. A deferred transaction would fail with SQLITE_BUSY_SNAPSHOT
/// instead of waiting on the busy timeout.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

pub struct SqlCartRepository {
    pool: DbPool,
}

impl SqlCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CartRepository for SqlCartRepository {
    async fn find_by_user(&self, user: &UserId) -> Result<Option<ShoppingCart>, RepositoryError> {
        let cart_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM shopping_cart WHERE user_id = ?")
                .bind(user.as_str())
                .fetch_optional(&self.pool)
                .await?;
        let Some(cart_id) = cart_id.map(CartId) else {
            return Ok(None);
        };

        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM shopping_cart_item i
             JOIN product p ON p.id = i.product_id
             WHERE i.cart_id = ?
             ORDER BY i.id"
        ))
        .bind(cart_id.0)
        .fetch_all(&self.pool)
        .await?;

        let mut cart = ShoppingCart::new(cart_id, user.clone());
        for row in &rows {
            cart.push(product_from_row(row)?);
        }
        Ok(Some(cart))
    }

    async fn add_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let exists = sqlx::query("SELECT 1 FROM product WHERE id = ?")
            .bind(product.0)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            tx.rollback().await?;
            return Ok(CartMutation::ProductMissing);
        }

        let now = Utc::now().to_rfc3339();
        let cart_id: i64 = sqlx::query_scalar(
            "INSERT INTO shopping_cart (user_id, created_at, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET updated_at = excluded.updated_at
             RETURNING id",
        )
        .bind(user.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO shopping_cart_item (cart_id, product_id, added_at) VALUES (?, ?, ?)",
        )
        .bind(cart_id)
        .bind(product.0)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(cart_id, product_id = product.0, "cart entry added");
        Ok(CartMutation::Applied)
    }

    async fn remove_product(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<CartMutation, RepositoryError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let cart_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM shopping_cart WHERE user_id = ?")
                .bind(user.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let Some(cart_id) = cart_id else {
            tx.rollback().await?;
            return Ok(CartMutation::CartMissing);
        };

        // One entry only: the oldest matching row.
        let result = sqlx::query(
            "DELETE FROM shopping_cart_item
             WHERE id = (
                 SELECT id FROM shopping_cart_item
                 WHERE cart_id = ? AND product_id = ?
                 ORDER BY id
                 LIMIT 1
             )",
        )
        .bind(cart_id)
        .bind(product.0)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(CartMutation::ProductMissing);
        }

        sqlx::query("UPDATE shopping_cart SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(cart_id, product_id = product.0, "cart entry removed");
        Ok(CartMutation::Applied)
    }
}
