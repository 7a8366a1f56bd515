use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::db::ProductStore;
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order is id order since ids only grow.
    products: IndexMap<i32, Product>,
    last_id: i32,
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let product = Product {
            id: inner.last_id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            price: payload.price,
            available: payload.available,
            category: payload.category,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        Ok(self
            .inner
            .read()
            .await
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .products
            .get_mut(&product.id)
            .ok_or_else(|| AppError::product_not_found(product.id))?;
        *stored = product.clone();
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // shift_remove keeps the remaining products in insertion order
        self.inner
            .write()
            .await
            .products
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::product_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::factory::fake_payloads;

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = MemoryProductStore::new();
        let payloads = fake_payloads(3);
        let mut ids = Vec::new();
        for p in &payloads {
            ids.push(store.create(p).await.unwrap().id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let payloads = fake_payloads(2);
        let first = store.create(&payloads[0]).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(&payloads[1]).await.unwrap();
        assert_eq!(second.id, 2);
        assert!(store.find(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_across_deletes() {
        let store = MemoryProductStore::new();
        for p in &fake_payloads(5) {
            store.create(p).await.unwrap();
        }
        store.delete(2).await.unwrap();
        let ids: Vec<i32> = store
            .list(&ProductQuery::All)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[tokio::test]
    async fn list_filters_by_name() {
        let store = MemoryProductStore::new();
        let payloads = fake_payloads(10);
        for p in &payloads {
            store.create(p).await.unwrap();
        }
        let name = payloads[0].name.clone();
        let expected = payloads.iter().filter(|p| p.name == name).count();
        let found = store.list(&ProductQuery::ByName(name.clone())).await.unwrap();
        assert_eq!(found.len(), expected);
        assert!(found.iter().all(|p| p.name == name));
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let store = MemoryProductStore::new();
        let ghost = Product {
            id: 41,
            name: "Ghost".to_string(),
            description: String::new(),
            price: rust_decimal::Decimal::ZERO,
            available: false,
            category: Category::Unknown,
        };
        assert!(matches!(
            store.update(&ghost).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let store = MemoryProductStore::new();
        assert!(matches!(store.delete(1).await, Err(AppError::NotFound(_))));
    }
}
