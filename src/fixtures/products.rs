//! Product Fixtures

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{categories::Categories, fixtures::FixtureError, products::Product};

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Unit price (e.g., "2.50")
    pub price: String,

    /// Categories the product belongs to
    #[serde(default)]
    pub categories: Vec<String>,

    /// Store selling the product
    #[serde(default)]
    pub store: String,
}

impl ProductFixture {
    /// Convert into a [`Product`] registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPrice`] if the price cannot be parsed.
    pub fn into_product(self, id: &str) -> Result<Product, FixtureError> {
        let price = parse_price(&self.price)?;
        let categories = self.categories.iter().map(String::as_str).collect::<Categories>();

        Ok(Product::new(id, self.name, price, self.store).with_categories(categories))
    }
}

/// Parse a price string (e.g., "2.50").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal number.
pub fn parse_price(s: &str) -> Result<Decimal, FixtureError> {
    Decimal::from_str(s.trim()).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}
