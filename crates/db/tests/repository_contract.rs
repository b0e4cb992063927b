use std::sync::Arc;

use rust_decimal::Decimal;

use shopcart_core::domain::cart::UserId;
use shopcart_core::domain::product::{CategoryId, NewProduct, ProductId};
use shopcart_db::repositories::{
    CartMutation, CartRepository, InMemoryCartRepository, InMemoryProductRepository,
    ProductRepository, SqlCartRepository, SqlProductRepository,
};
use shopcart_db::{connect_with_settings, migrations, DemoCatalog};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        match (&$left, &$right) {
            (left, right) => {
                if left != right {
                    return Err(format!(
                        "assertion failed: `left == right` (`{left:?}` != `{right:?}`)"
                    ));
                }
            }
        }
    };
}

type Repositories = (Arc<dyn ProductRepository>, Arc<dyn CartRepository>);

async fn sql_repositories() -> ContractResult<Repositories> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    Ok((
        Arc::new(SqlProductRepository::new(pool.clone())),
        Arc::new(SqlCartRepository::new(pool)),
    ))
}

fn memory_repositories() -> Repositories {
    let products = Arc::new(InMemoryProductRepository::default());
    let carts = Arc::new(InMemoryCartRepository::new(Arc::clone(&products)));
    (products, carts)
}

async fn catalog_and_cart_contract(
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
) -> ContractResult {
    let widget = products
        .insert(NewProduct {
            name: "Widget".to_string(),
            price: Decimal::new(999, 2),
            description: Some("A widget".to_string()),
            category_id: Some(CategoryId(1)),
        })
        .await
        .map_err(|error| format!("insert widget: {error}"))?;
    let gift_card = products
        .insert(NewProduct {
            name: "Gift Card".to_string(),
            price: Decimal::new(5000, 2),
            description: None,
            category_id: None,
        })
        .await
        .map_err(|error| format!("insert gift card: {error}"))?;

    let all = products.list(None).await.map_err(|error| format!("list all: {error}"))?;
    require_eq!(all, vec![widget.clone(), gift_card.clone()]);
    let in_category = products
        .list(Some(CategoryId(1)))
        .await
        .map_err(|error| format!("list category: {error}"))?;
    require_eq!(in_category, vec![widget.clone()]);
    let empty = products
        .list(Some(CategoryId(999)))
        .await
        .map_err(|error| format!("list empty: {error}"))?;
    require!(empty.is_empty(), "category 999 should hold nothing, got {empty:?}");

    let alice = UserId("alice@example.com".to_string());
    let bob = UserId("bob@example.com".to_string());

    let before = carts.find_by_user(&alice).await.map_err(|error| format!("find: {error}"))?;
    require!(before.is_none(), "alice should start without a cart, got {before:?}");
    let missing = carts
        .add_product(&alice, ProductId(404))
        .await
        .map_err(|error| format!("add missing: {error}"))?;
    require_eq!(missing, CartMutation::ProductMissing);
    let after = carts.find_by_user(&alice).await.map_err(|error| format!("find: {error}"))?;
    require!(after.is_none(), "adding a missing product created a cart: {after:?}");

    for product in [widget.id, gift_card.id, widget.id] {
        let added =
            carts.add_product(&alice, product).await.map_err(|error| format!("add: {error}"))?;
        require_eq!(added, CartMutation::Applied);
    }
    let cart = carts
        .find_by_user(&alice)
        .await
        .map_err(|error| format!("find: {error}"))?
        .ok_or("cart missing")?;
    let ids: Vec<ProductId> = cart.products.iter().map(|product| product.id).collect();
    require_eq!(ids, vec![widget.id, gift_card.id, widget.id]);
    require_eq!(cart.user, alice);

    let bobs = carts.find_by_user(&bob).await.map_err(|error| format!("find bob: {error}"))?;
    require!(bobs.is_none(), "bob should not see a cart, got {bobs:?}");

    let removed =
        carts.remove_product(&alice, widget.id).await.map_err(|error| format!("remove: {error}"))?;
    require_eq!(removed, CartMutation::Applied);
    let cart = carts
        .find_by_user(&alice)
        .await
        .map_err(|error| format!("find: {error}"))?
        .ok_or("cart missing")?;
    let ids: Vec<ProductId> = cart.products.iter().map(|product| product.id).collect();
    require_eq!(ids, vec![gift_card.id, widget.id]);

    let removed =
        carts.remove_product(&alice, widget.id).await.map_err(|error| format!("remove: {error}"))?;
    require_eq!(removed, CartMutation::Applied);
    let again = carts
        .remove_product(&alice, widget.id)
        .await
        .map_err(|error| format!("remove again: {error}"))?;
    require_eq!(again, CartMutation::ProductMissing);
    let for_bob = carts
        .remove_product(&bob, widget.id)
        .await
        .map_err(|error| format!("remove for bob: {error}"))?;
    require_eq!(for_bob, CartMutation::CartMissing);

    Ok(())
}

#[tokio::test]
async fn sql_repositories_honor_catalog_and_cart_contract() -> ContractResult {
    let (products, carts) = sql_repositories().await?;
    catalog_and_cart_contract(products, carts).await
}

#[tokio::test]
async fn in_memory_repositories_honor_catalog_and_cart_contract() -> ContractResult {
    let (products, carts) = memory_repositories();
    catalog_and_cart_contract(products, carts).await
}

#[tokio::test]
async fn demo_catalog_is_visible_through_repository() -> ContractResult {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    DemoCatalog::load(&pool).await.map_err(|error| format!("seed: {error}"))?;

    let products = SqlProductRepository::new(pool);
    let widget = products
        .find_by_id(ProductId(1))
        .await
        .map_err(|error| format!("find: {error}"))?
        .ok_or("no widget")?;
    require_eq!(widget.name, "Widget");
    require_eq!(widget.price, Decimal::new(999, 2));

    let first_category =
        products.list(Some(CategoryId(1))).await.map_err(|error| format!("list: {error}"))?;
    require_eq!(first_category.len(), 2);

    let uncategorized =
        products.find_by_id(ProductId(4)).await.map_err(|error| format!("find: {error}"))?;
    require!(
        uncategorized.is_some_and(|product| product.category_id.is_none()),
        "gift card should have no category"
    );

    Ok(())
}
