//! Rule Book
//!
//! A shared handle to the live discount tree. Readers price against a
//! snapshot; coupon redemption swaps in a new tree.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::{
    basket::Basket,
    discounts::{Discount, DiscountError},
    pricing::PricedBasket,
};

/// Thread-safe holder of the active discount tree.
#[derive(Debug)]
pub struct RuleBook {
    current: RwLock<Arc<Discount>>,
}

impl RuleBook {
    /// Wrap a discount tree.
    pub fn new(discount: impl Into<Discount>) -> Self {
        Self {
            current: RwLock::new(Arc::new(discount.into())),
        }
    }

    /// The tree as it is right now.
    pub fn snapshot(&self) -> Arc<Discount> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Redeem a coupon code across the whole tree.
    ///
    /// Returns `true` if at least one rule was waiting for `code`.
    pub fn apply_coupon(&self, code: &str) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        if !current.pending_coupons().contains(&code) {
            debug!(code, "coupon did not match any pending rule");

            return false;
        }

        *current = Arc::new(current.apply_coupon(code));

        info!(code, "coupon redeemed");

        true
    }

    /// Coupon codes still waiting to be redeemed.
    pub fn pending_coupons(&self) -> Vec<String> {
        self.snapshot()
            .pending_coupons()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Price a basket against the current tree.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError`] if the calculation fails.
    pub fn price(&self, basket: &Basket<'_>) -> Result<PricedBasket, DiscountError> {
        let priced = self.snapshot().price(basket)?;

        debug!(
            lines = priced.lines().len(),
            subtotal = %priced.subtotal(),
            total = %priced.total(),
            savings = %priced.savings(),
            "priced basket"
        );

        Ok(priced)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        catalog::Catalog, discounts::SimpleDiscount, percentages::from_points, products::Product,
        scope::DiscountScope,
    };

    use super::*;

    fn catalog() -> Result<Catalog, crate::catalog::CatalogError> {
        let mut catalog = Catalog::new();

        catalog.insert(Product::new("lamp", "Desk Lamp", Decimal::from(50), "lights"))?;

        Ok(catalog)
    }

    fn half_price_with(code: &str) -> Result<SimpleDiscount, crate::discounts::RuleError> {
        SimpleDiscount::with_coupon(from_points(50)?, DiscountScope::store(), code)
    }

    #[test]
    fn redeeming_a_coupon_swaps_the_tree() -> TestResult {
        let catalog = catalog()?;
        let mut basket = Basket::new(&catalog);
        basket.add_by_id("lamp", 2)?;

        let book = RuleBook::new(half_price_with("LIGHT")?);
        let before = book.snapshot();

        assert_eq!(book.price(&basket)?.total(), Decimal::from(100));
        assert!(book.apply_coupon("LIGHT"));
        assert_eq!(book.price(&basket)?.total(), Decimal::from(50));

        // Snapshots taken earlier keep the old tree.
        assert_eq!(before.price(&basket)?.total(), Decimal::from(100));

        Ok(())
    }

    #[test]
    fn unknown_and_repeated_coupons_change_nothing() -> TestResult {
        let book = RuleBook::new(half_price_with("LIGHT")?);

        assert!(!book.apply_coupon("DARK"));
        assert_eq!(book.pending_coupons(), ["LIGHT"]);

        assert!(book.apply_coupon("LIGHT"));
        assert!(!book.apply_coupon("LIGHT"));
        assert!(book.pending_coupons().is_empty());

        Ok(())
    }

    #[test]
    fn readers_see_a_whole_tree_while_coupons_are_redeemed() -> TestResult {
        let catalog = catalog()?;
        let mut basket = Basket::new(&catalog);
        basket.add_by_id("lamp", 1)?;

        let book = RuleBook::new(half_price_with("LIGHT")?);

        let totals = thread::scope(|scope| {
            let readers: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| book.price(&basket).map(|priced| priced.total())))
                .collect();

            book.apply_coupon("LIGHT");

            readers
                .into_iter()
                .map(|reader| reader.join().map_err(|_err| "reader panicked"))
                .collect::<Result<Vec<_>, _>>()
        })?;

        for total in totals {
            let total = total?;

            assert!(total == Decimal::from(50) || total == Decimal::from(25));
        }

        assert_eq!(book.price(&basket)?.total(), Decimal::from(25));

        Ok(())
    }
}
