use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::ProductStore;
use crate::error::{AppError, AppResult};
use crate::models::*;

const COLUMNS: &str = "id, name, description, price, available, category";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.available)
        .bind(payload.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let select = format!("SELECT {COLUMNS} FROM products");
        let products = match query {
            ProductQuery::All => {
                sqlx::query_as::<_, Product>(&format!("{select} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await?
            }
            ProductQuery::ByName(name) => {
                sqlx::query_as::<_, Product>(&format!("{select} WHERE name = $1 ORDER BY id"))
                    .bind(name)
                    .fetch_all(&self.pool)
                    .await?
            }
            ProductQuery::ByCategory(category) => {
                sqlx::query_as::<_, Product>(&format!("{select} WHERE category = $1 ORDER BY id"))
                    .bind(*category)
                    .fetch_all(&self.pool)
                    .await?
            }
            ProductQuery::ByAvailability(available) => {
                sqlx::query_as::<_, Product>(&format!("{select} WHERE available = $1 ORDER BY id"))
                    .bind(*available)
                    .fetch_all(&self.pool)
                    .await?
            }
            ProductQuery::ByPrice(price) => {
                sqlx::query_as::<_, Product>(&format!("{select} WHERE price = $1 ORDER BY id"))
                    .bind(*price)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(products)
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name        = $1,
                description = $2,
                price       = $3,
                available   = $4,
                category    = $5
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category)
        .bind(product.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::product_not_found(product.id))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::product_not_found(id));
        }
        Ok(())
    }
}

/// These run against the database named by `DATABASE_URL` and are skipped
/// when it is unset. Rows are left behind, so assertions only look at ids
/// created by the test itself.
#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::models::factory::fake_payloads;

    async fn store() -> Option<PgProductStore> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres store test");
            return None;
        };
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        Some(PgProductStore::new(pool))
    }

    async fn create_all(store: &PgProductStore, payloads: &[ProductPayload]) -> Vec<Product> {
        let mut created = Vec::new();
        for p in payloads {
            created.push(store.create(p).await.unwrap());
        }
        created
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn create_then_find() {
        let Some(store) = store().await else { return };
        let payload = fake_payloads(1).remove(0);

        let created = store.create(&payload).await.unwrap();
        assert_eq!(created.name, payload.name);
        assert_eq!(created.description, payload.description);
        assert_eq!(created.price, payload.price);
        assert_eq!(created.available, payload.available);
        assert_eq!(created.category, payload.category);

        let found = store.find(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn list_by_each_filter() {
        let Some(store) = store().await else { return };
        let mut payloads = fake_payloads(6);
        let tag = format!("pg-list-{}", rand::random::<u32>());
        payloads[0].name = tag.clone();
        payloads[1].name = tag.clone();
        let created = create_all(&store, &payloads).await;
        let mine = ids(&created);

        let all = ids(&store.list(&ProductQuery::All).await.unwrap());
        assert!(mine.iter().all(|id| all.contains(id)));
        assert!(all.windows(2).all(|w| w[0] < w[1]), "ordered by id");

        let by_name = store.list(&ProductQuery::ByName(tag)).await.unwrap();
        assert_eq!(ids(&by_name), vec![created[0].id, created[1].id]);

        let queries = [
            ProductQuery::ByCategory(created[2].category),
            ProductQuery::ByAvailability(created[3].available),
            ProductQuery::ByPrice(created[4].price),
        ];
        for (query, product) in queries.iter().zip(&created[2..]) {
            let found = store.list(query).await.unwrap();
            assert!(found.iter().all(|p| query.matches(p)), "{:?}", query);
            assert!(ids(&found).contains(&product.id), "{:?}", query);
        }
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let Some(store) = store().await else { return };
        let payloads = fake_payloads(2);
        let mut product = store.create(&payloads[0]).await.unwrap();

        product.apply(payloads[1].clone());
        product.price = Decimal::new(1250, 2);
        let updated = store.update(&product).await.unwrap();
        assert_eq!(updated, product);
        assert_eq!(store.find(product.id).await.unwrap(), Some(product));
    }

    #[tokio::test]
    async fn update_and_delete_missing_are_not_found() {
        let Some(store) = store().await else { return };
        let mut product = store.create(&fake_payloads(1)[0]).await.unwrap();

        store.delete(product.id).await.unwrap();
        assert!(store.find(product.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(product.id).await,
            Err(AppError::NotFound(_))
        ));

        product.name = "Ghost".to_string();
        assert!(matches!(
            store.update(&product).await,
            Err(AppError::NotFound(_))
        ));
    }
}
