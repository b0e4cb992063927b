use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Products the demo catalog is expected to contain after loading.
const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct { id: 1, name: "Widget", price: "9.99", category_id: Some(1) },
    DemoProduct { id: 2, name: "Gadget", price: "24.50", category_id: Some(1) },
    DemoProduct { id: 3, name: "Sprocket", price: "3.25", category_id: Some(2) },
    DemoProduct { id: 4, name: "Gift Card", price: "50.00", category_id: None },
];

const DEMO_CATEGORY_IDS: &[i64] = &[1, 2];

/// Deterministic demo catalog for local runs and smoke checks.
///
/// Loading is idempotent: rows that already exist are left untouched.
pub struct DemoCatalog;

impl DemoCatalog {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_catalog.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            categories_seeded: DEMO_CATEGORY_IDS.len(),
            products_seeded: DEMO_PRODUCTS.iter().map(|product| product.name).collect(),
        })
    }

    /// Checks every demo row is present with the expected name, price and category.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let ids = sql_array_from_ids(DEMO_CATEGORY_IDS);
        let categories: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(1) FROM category WHERE id IN {ids}"))
                .fetch_one(pool)
                .await?;
        checks.push(("categories", categories == DEMO_CATEGORY_IDS.len() as i64));

        for product in DEMO_PRODUCTS {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(
                     SELECT 1 FROM product
                     WHERE id = ?1 AND name = ?2 AND price = ?3 AND category_id IS ?4
                 )",
            )
            .bind(product.id)
            .bind(product.name)
            .bind(product.price)
            .bind(product.category_id)
            .fetch_one(pool)
            .await?;
            checks.push((product.name, matches == 1));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug, Clone, Copy)]
struct DemoProduct {
    id: i64,
    name: &'static str,
    price: &'static str,
    category_id: Option<i64>,
}

fn sql_array_from_ids(ids: &[i64]) -> String {
    let joined = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    format!("({joined})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub categories_seeded: usize,
    pub products_seeded: Vec<&'static str>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
