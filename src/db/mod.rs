use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Product, ProductPayload, ProductQuery};

mod memory;
mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Persistence seam for products. Handlers only ever see this trait, so the
/// router runs unchanged on Postgres or in memory.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists a new product; the store assigns the id.
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product>;

    async fn find(&self, id: i32) -> AppResult<Option<Product>>;

    /// Products matching `query`, in ascending id order.
    async fn list(&self, query: &ProductQuery) -> AppResult<Vec<Product>>;

    /// Replaces every mutable field of the row with `product.id`.
    /// Fails with `NotFound` if the row no longer exists.
    async fn update(&self, product: &Product) -> AppResult<Product>;

    /// Fails with `NotFound` if there is nothing to delete.
    async fn delete(&self, id: i32) -> AppResult<()>;
}
