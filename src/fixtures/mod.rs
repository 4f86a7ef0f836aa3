//! Fixtures
//!
//! Load a catalog, a basket, a discount tree and coupons to redeem from a
//! single YAML file.

use std::{fs, path::Path, str::FromStr};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    book::RuleBook,
    catalog::{Catalog, CatalogError},
    discounts::{Discount, RuleError},
    fixtures::{discounts::DiscountFixture, products::ProductFixture},
    products::ProductKey,
};

pub mod discounts;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog rejected a product
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Discount rule could not be built
    #[error("Invalid discount rule: {0}")]
    Rule(#[from] RuleError),

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),
}

/// Root of a fixture file
#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,

    /// Basket contents
    #[serde(default)]
    pub basket: Vec<BasketLineFixture>,

    /// Coupon codes to redeem
    #[serde(default)]
    pub coupons: Vec<String>,

    /// Discount rule tree
    pub discount: DiscountFixture,
}

/// Basket line from YAML
#[derive(Debug, Deserialize)]
pub struct BasketLineFixture {
    /// Product id
    pub product: String,

    /// Units bought
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    catalog: Catalog,

    /// Basket lines, in file order
    lines: Vec<(ProductKey, u32)>,

    /// Rule tree as written, before any coupon is redeemed
    discount: Discount,

    coupons: Vec<String>,
}

impl Fixture {
    /// Load a fixture from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it refers to
    /// unknown products or describes invalid rules.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        contents.parse()
    }

    /// Build a fixture from an already parsed file
    ///
    /// # Errors
    ///
    /// Returns an error if the file refers to unknown products or describes
    /// invalid rules.
    pub fn from_file(file: FixtureFile) -> Result<Self, FixtureError> {
        let mut catalog = Catalog::new();

        for (id, product) in file.products {
            let product = product.into_product(&id)?;

            catalog.insert(product)?;
        }

        let lines = file
            .basket
            .iter()
            .map(|line| {
                catalog
                    .key_of(&line.product)
                    .map(|key| (key, line.quantity))
                    .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let discount = file.discount.build(&catalog)?;

        Ok(Self {
            catalog,
            lines,
            discount,
            coupons: file.coupons,
        })
    }

    /// Get the catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Coupon codes listed in the fixture
    pub fn coupons(&self) -> &[String] {
        &self.coupons
    }

    /// Create the basket described by the fixture
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be added.
    pub fn basket(&self) -> Result<Basket<'_>, FixtureError> {
        let mut basket = Basket::new(&self.catalog);

        for (key, quantity) in &self.lines {
            basket.add(*key, *quantity)?;
        }

        Ok(basket)
    }

    /// Rule tree with the fixture's coupons redeemed
    pub fn discount(&self) -> Discount {
        self.coupons
            .iter()
            .fold(self.discount.clone(), |discount, code| discount.apply_coupon(code))
    }

    /// Rule tree as written, before any coupon is redeemed
    pub fn unredeemed_discount(&self) -> &Discount {
        &self.discount
    }

    /// Shared rule book with the fixture's coupons redeemed
    pub fn rule_book(&self) -> RuleBook {
        let book = RuleBook::new(self.discount.clone());

        for code in &self.coupons {
            book.apply_coupon(code);
        }

        book
    }
}

impl FromStr for Fixture {
    type Err = FixtureError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let file: FixtureFile = serde_norway::from_str(contents)?;

        Self::from_file(file)
    }
}
