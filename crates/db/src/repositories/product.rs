use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use shopcart_core::domain::product::{CategoryId, NewProduct, Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.name, p.price, p.description, p.category_id";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list(&self, category: Option<CategoryId>) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM product p WHERE p.category_id = ? ORDER BY p.id"
                ))
                .bind(category.0)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product p ORDER BY p.id"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(product_from_row).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product p WHERE p.id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if let Some(category) = product.category_id {
            sqlx::query("INSERT OR IGNORE INTO category (id) VALUES (?)")
                .bind(category.0)
                .execute(&mut *tx)
                .await?;
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product (name, price, description, category_id, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&product.name)
        .bind(product.price.to_string())
        .bind(product.description.as_deref())
        .bind(product.category_id.map(|category| category.0))
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(product_id = id, "product row inserted");

        Ok(product.into_product(ProductId(id)))
    }
}

pub(crate) fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let raw_price: String = row.try_get("price")?;
    let price = Decimal::from_str(&raw_price).map_err(|error| {
        RepositoryError::Decode(format!("invalid stored price `{raw_price}`: {error}"))
    })?;

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("name")?,
        price,
        description: row.try_get("description")?,
        category_id: row.try_get::<Option<i64>, _>("category_id")?.map(CategoryId),
    })
}
