//! Products

use rust_decimal::Decimal;
use slotmap::new_key_type;

use crate::categories::Categories;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// External product identifier (e.g. a SKU)
    pub id: String,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Category memberships
    pub categories: Categories,

    /// Owning store identifier
    pub store: String,
}

impl Product {
    /// Create a product with no categories, owned by `store`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        store: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            categories: Categories::empty(),
            store: store.into(),
        }
    }

    /// Set the product's categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Categories) -> Self {
        self.categories = categories;
        self
    }
}
