pub mod category;
pub mod product;

#[cfg(test)]
pub mod factory;

pub use category::*;
pub use product::*;
