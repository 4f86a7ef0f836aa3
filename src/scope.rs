//! Discount Scope
//!
//! Which basket lines a rule is allowed to discount.

use crate::{
    basket::BasketLine,
    categories::normalize,
    products::{Product, ProductKey},
};

/// The set of products a discount rule is eligible to affect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountScope {
    /// Exactly one product.
    Product(ProductKey),

    /// Every product in a category. Stored lower-cased.
    Category(String),

    /// Every product in the store.
    Store,
}

impl DiscountScope {
    /// Scope a rule to a single product.
    pub fn product(key: ProductKey) -> Self {
        Self::Product(key)
    }

    /// Scope a rule to a category, matched case-insensitively.
    pub fn category(name: &str) -> Self {
        Self::Category(normalize(name))
    }

    /// Scope a rule to every product.
    pub fn store() -> Self {
        Self::Store
    }

    /// Check whether a product falls within this scope.
    pub fn matches(&self, key: ProductKey, product: &Product) -> bool {
        match self {
            Self::Product(target) => *target == key,
            Self::Category(name) => product.categories.contains(name),
            Self::Store => true,
        }
    }

    /// Check whether a basket line falls within this scope.
    pub fn matches_line(&self, line: &BasketLine<'_>) -> bool {
        self.matches(line.key(), line.product())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use slotmap::SlotMap;

    use crate::categories::Categories;

    use super::*;

    fn cheese() -> Product {
        Product::new("cheese", "Cheddar", Decimal::new(300, 2), "deli")
            .with_categories(Categories::from_strs(&["Dairy", "Deli"]))
    }

    #[test]
    fn store_scope_matches_everything() {
        assert!(DiscountScope::store().matches(ProductKey::default(), &cheese()));
    }

    #[test]
    fn category_scope_is_case_insensitive() {
        let key = ProductKey::default();

        assert!(DiscountScope::category("DAIRY").matches(key, &cheese()));
        assert!(DiscountScope::category("deli").matches(key, &cheese()));
        assert!(!DiscountScope::category("bakery").matches(key, &cheese()));
    }

    #[test]
    fn product_scope_matches_only_its_key() {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();
        let cheese_key = keys.insert(());
        let other_key = keys.insert(());

        let scope = DiscountScope::product(cheese_key);

        assert!(scope.matches(cheese_key, &cheese()));
        assert!(!scope.matches(other_key, &cheese()));
    }
}
