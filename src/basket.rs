//! Basket

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    products::{Product, ProductKey},
};

/// Errors related to basket construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// The product key is not in the catalog.
    #[error("product key {0:?} is not in the catalog")]
    UnknownProduct(ProductKey),

    /// The external product id is not in the catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProductId(String),

    /// Adding units to an existing line overflowed its quantity.
    #[error("quantity overflowed for product {0}")]
    QuantityOverflow(String),

    /// Price multiplied by quantity overflowed.
    #[error("line total overflowed for product {0}")]
    Overflow(String),
}

/// A product in the basket and the number of units being bought.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketLine<'a> {
    key: ProductKey,
    product: &'a Product,
    quantity: u32,
}

impl<'a> BasketLine<'a> {
    /// Return the product key.
    pub fn key(&self) -> ProductKey {
        self.key
    }

    /// Return the catalog product.
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// Return the purchased quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Undiscounted line total (`price * quantity`).
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::Overflow`] if the multiplication overflows.
    pub fn subtotal(&self) -> Result<Decimal, BasketError> {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| BasketError::Overflow(self.product.id.clone()))
    }
}

/// Basket
///
/// Lines keep the order products were first added in; adding a product again
/// accumulates onto its existing line.
#[derive(Debug, Clone)]
pub struct Basket<'a> {
    catalog: &'a Catalog,
    lines: SmallVec<[BasketLine<'a>; 10]>,
}

impl<'a> Basket<'a> {
    /// Create an empty basket against a catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Basket {
            catalog,
            lines: SmallVec::new(),
        }
    }

    /// Create a basket holding a single line.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::UnknownProduct`] if `key` is not in the catalog.
    pub fn single(
        catalog: &'a Catalog,
        key: ProductKey,
        quantity: u32,
    ) -> Result<Self, BasketError> {
        let mut basket = Self::new(catalog);

        basket.add(key, quantity)?;

        Ok(basket)
    }

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// - [`BasketError::UnknownProduct`]: `key` is not in the catalog.
    /// - [`BasketError::QuantityOverflow`]: the line's quantity would exceed `u32::MAX`.
    pub fn add(&mut self, key: ProductKey, quantity: u32) -> Result<&mut Self, BasketError> {
        let product = self
            .catalog
            .get(key)
            .ok_or(BasketError::UnknownProduct(key))?;

        if let Some(line) = self.lines.iter_mut().find(|line| line.key == key) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| BasketError::QuantityOverflow(product.id.clone()))?;
        } else {
            self.lines.push(BasketLine {
                key,
                product,
                quantity,
            });
        }

        Ok(self)
    }

    /// Add `quantity` units of a product by its external id.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::UnknownProductId`] if `id` is not in the catalog.
    pub fn add_by_id(&mut self, id: &str, quantity: u32) -> Result<&mut Self, BasketError> {
        let key = self
            .catalog
            .key_of(id)
            .ok_or_else(|| BasketError::UnknownProductId(id.to_string()))?;

        self.add(key, quantity)
    }

    /// Iterate the basket lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &BasketLine<'a>> {
        self.lines.iter()
    }

    /// Return the line for a product, if present.
    pub fn line(&self, key: ProductKey) -> Option<&BasketLine<'a>> {
        self.lines.iter().find(|line| line.key == key)
    }

    /// Return the catalog this basket was built against.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Calculate the undiscounted subtotal of the basket.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::Overflow`] if any line total or the sum overflows.
    pub fn subtotal(&self) -> Result<Decimal, BasketError> {
        self.lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.subtotal()?)
                .ok_or_else(|| BasketError::Overflow(line.product.id.clone()))
        })
    }

    /// Get the number of lines in the basket.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
