use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::Category;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 250;

/// Prices are persisted as `NUMERIC(14, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 1_000_000_000_000;

/// Core product entity. `id` is assigned by the store and never taken from a
/// request body.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Overwrites every mutable field from `payload`; `id` is left untouched.
    pub fn apply(&mut self, payload: ProductPayload) {
        self.name = payload.name;
        self.description = payload.description;
        self.price = payload.price;
        self.available = payload.available;
        self.category = payload.category;
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// JSON body accepted by create and update. Unknown keys, including `id`,
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl ProductPayload {
    pub fn from_json(body: &[u8]) -> AppResult<Self> {
        let payload: Self = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid product: {}", e)))?;
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest("price must be >= 0".to_string()));
        }
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(AppError::BadRequest(format!(
                "price must have at most {} decimal places",
                PRICE_SCALE
            )));
        }
        if self.price >= Decimal::from(PRICE_LIMIT) {
            return Err(AppError::BadRequest(format!(
                "price must be below {}",
                PRICE_LIMIT
            )));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::BadRequest(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ProductFilters {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
    pub price: Option<String>,
}

/// At most one filter applies per list request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductQuery {
    All,
    ByName(String),
    ByCategory(Category),
    ByAvailability(bool),
    ByPrice(Decimal),
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductQuery::All => true,
            ProductQuery::ByName(name) => product.name == *name,
            ProductQuery::ByCategory(category) => product.category == *category,
            ProductQuery::ByAvailability(available) => product.available == *available,
            ProductQuery::ByPrice(price) => product.price == *price,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Picks the filter by precedence: name, category, available, price.
impl TryFrom<ProductFilters> for ProductQuery {
    type Error = AppError;

    fn try_from(filters: ProductFilters) -> AppResult<Self> {
        if let Some(name) = present(filters.name) {
            return Ok(ProductQuery::ByName(name));
        }
        if let Some(category) = present(filters.category) {
            let category = category
                .parse::<Category>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            return Ok(ProductQuery::ByCategory(category));
        }
        if let Some(available) = present(filters.available) {
            let available = match available.to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(AppError::BadRequest(format!(
                        "available must be true or false, got [{}]",
                        available
                    )))
                }
            };
            return Ok(ProductQuery::ByAvailability(available));
        }
        if let Some(price) = present(filters.price) {
            let price = price
                .trim()
                .parse::<Decimal>()
                .map_err(|_| AppError::BadRequest(format!("invalid price [{}]", price)))?;
            return Ok(ProductQuery::ByPrice(price));
        }
        Ok(ProductQuery::All)
    }
}
