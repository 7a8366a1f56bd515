//! Random products for tests.

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{Category, ProductPayload};

static ADJECTIVES: &[&str] = &[
    "Premium", "Deluxe", "Classic", "Smart", "Eco", "Compact", "Portable", "Basic",
];

static NOUNS: &[&str] = &["Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Wrench"];

pub fn fake_payload(rng: &mut impl Rng) -> ProductPayload {
    let adj = ADJECTIVES.choose(rng).unwrap_or(&"Basic");
    let noun = NOUNS.choose(rng).unwrap_or(&"Hat");
    ProductPayload {
        name: format!("{} {}", adj, noun),
        description: format!("A {} {}", adj.to_lowercase(), noun.to_lowercase()),
        price: Decimal::new(rng.gen_range(50..100_000), 2),
        available: rng.gen_bool(0.5),
        category: *Category::ALL.choose(rng).unwrap_or(&Category::Unknown),
    }
}

pub fn fake_payloads(count: usize) -> Vec<ProductPayload> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| fake_payload(&mut rng)).collect()
}
