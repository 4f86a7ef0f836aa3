//! Catalog
//!
//! Read-only product lookup consumed by baskets and discount rules.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Errors raised while registering products.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product with this identifier is already registered.
    #[error("product {0} is already registered")]
    DuplicateProduct(String),

    /// Unit prices must not be negative.
    #[error("product {0} has a negative price")]
    NegativePrice(String),
}

/// Product catalog for a store (or a whole marketplace).
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    ids: FxHashMap<String, ProductKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product and return its key.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: the product id is already registered.
    /// - [`CatalogError::NegativePrice`]: the unit price is below zero.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        if product.price < Decimal::ZERO {
            return Err(CatalogError::NegativePrice(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);

        Ok(key)
    }

    /// Look up a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Resolve an external product id to its key.
    pub fn key_of(&self, id: &str) -> Option<ProductKey> {
        self.ids.get(id).copied()
    }

    /// Look up a product by its external id.
    pub fn find(&self, id: &str) -> Option<(ProductKey, &Product)> {
        let key = self.key_of(id)?;

        self.products.get(key).map(|product| (key, product))
    }

    /// Number of registered products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
