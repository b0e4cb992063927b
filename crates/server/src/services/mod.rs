//! Application services over the repository traits.
//!
//! Services own the not-found policy: repositories report misses as values and
//! the services turn them into [`ApplicationError`](shopcart_core::ApplicationError)s.

pub mod cart;
pub mod catalog;

pub use cart::CartService;
pub use catalog::CatalogService;
