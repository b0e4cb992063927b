use std::sync::Arc;

use tracing::info;

use shopcart_core::domain::product::{CategoryId, Product, ProductDraft, ProductId};
use shopcart_core::errors::ApplicationError;
use shopcart_db::repositories::ProductRepository;

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.products.list(None).await?)
    }

    /// Products in `category`. An empty result is a miss, not an empty success.
    pub async fn list_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Product>, ApplicationError> {
        let products = self.products.list(Some(category)).await?;
        if products.is_empty() {
            info!(
                event_name = "catalog.category.empty",
                category_id = category.0,
                "no products found for category"
            );
            return Err(ApplicationError::NoProductsInCategory(category));
        }
        Ok(products)
    }

    pub async fn find(&self, id: ProductId) -> Result<Product, ApplicationError> {
        self.products.find_by_id(id).await?.ok_or(ApplicationError::ProductNotFound(id))
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product, ApplicationError> {
        let product = draft.validate()?;
        let created = self.products.insert(product).await?;
        info!(
            event_name = "catalog.product.created",
            product_id = created.id.0,
            category_id = created.category_id.map(|category| category.0),
            "product created"
        );
        Ok(created)
    }
}
