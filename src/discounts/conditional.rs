//! Conditional Discount

use crate::{
    basket::Basket,
    conditions::Condition,
    discounts::{Discount, DiscountError, LineAmounts},
};

/// Gates an inner discount behind a condition over the whole basket.
#[derive(Debug, Clone)]
pub struct ConditionalDiscount {
    condition: Condition,
    inner: Box<Discount>,
}

impl ConditionalDiscount {
    /// Apply `inner` only while `condition` holds.
    pub fn new(condition: Condition, inner: impl Into<Discount>) -> Self {
        Self {
            condition,
            inner: Box::new(inner.into()),
        }
    }

    /// Return the gating condition
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Return the gated discount
    pub fn inner(&self) -> &Discount {
        &self.inner
    }

    /// Redeem a coupon code in the gated discount.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        Self {
            condition: self.condition.clone(),
            inner: Box::new(self.inner.apply_coupon(code)),
        }
    }

    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        if !self.condition.is_satisfied_by(basket) {
            return Ok(LineAmounts::new());
        }

        self.inner.line_discounts(basket, bases)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        catalog::Catalog,
        categories::Categories,
        discounts::SimpleDiscount,
        percentages::from_points,
        products::Product,
        scope::DiscountScope,
    };

    use super::*;

    fn catalog() -> Result<Catalog, crate::catalog::CatalogError> {
        let mut catalog = Catalog::new();

        catalog.insert(
            Product::new("tv", "Television", Decimal::from(400), "electro")
                .with_categories(Categories::from_strs(&["electronics"])),
        )?;
        catalog.insert(
            Product::new("hdmi", "HDMI Cable", Decimal::from(10), "electro")
                .with_categories(Categories::from_strs(&["electronics", "accessories"])),
        )?;
        catalog.insert(
            Product::new("case", "Phone Case", Decimal::from(15), "electro")
                .with_categories(Categories::from_strs(&["accessories"])),
        )?;

        Ok(catalog)
    }

    fn ten_percent_off_electronics() -> Result<SimpleDiscount, crate::discounts::RuleError> {
        SimpleDiscount::new(from_points(10)?, DiscountScope::category("electronics"))
    }

    #[test]
    fn basket_value_threshold_gates_the_discount() -> TestResult {
        let catalog = catalog()?;
        let rule = Discount::from(ConditionalDiscount::new(
            Condition::MinSubtotal {
                scope: DiscountScope::store(),
                amount: Decimal::from(500),
            },
            ten_percent_off_electronics()?,
        ));

        let mut small = Basket::new(&catalog);
        small.add_by_id("tv", 1)?;

        let mut large = Basket::new(&catalog);
        large.add_by_id("tv", 1)?.add_by_id("hdmi", 10)?;

        assert_eq!(rule.discount_amount(&small)?, Decimal::ZERO);
        assert_eq!(rule.discount_amount(&large)?, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn distinct_products_gate_the_discount() -> TestResult {
        let catalog = catalog()?;
        let rule = Discount::from(ConditionalDiscount::new(
            Condition::MinDistinctProducts {
                scope: DiscountScope::category("accessories"),
                count: 2,
            },
            SimpleDiscount::new(from_points(20)?, DiscountScope::category("accessories"))?,
        ));

        let mut one = Basket::new(&catalog);
        one.add_by_id("case", 3)?;

        let mut two = Basket::new(&catalog);
        two.add_by_id("case", 1)?.add_by_id("hdmi", 1)?;

        assert_eq!(rule.discount_amount(&one)?, Decimal::ZERO);
        assert_eq!(rule.discount_amount(&two)?, Decimal::from(5));

        Ok(())
    }

    #[test]
    fn coupons_reach_the_gated_discount() -> TestResult {
        let catalog = catalog()?;
        let rule = ConditionalDiscount::new(
            Condition::Constant(true),
            SimpleDiscount::with_coupon(from_points(50)?, DiscountScope::store(), "HALF")?,
        );

        let mut basket = Basket::new(&catalog);
        basket.add_by_id("case", 2)?;

        assert_eq!(
            Discount::from(rule.clone()).discount_amount(&basket)?,
            Decimal::ZERO
        );
        assert_eq!(
            Discount::from(rule.apply_coupon("HALF")).discount_amount(&basket)?,
            Decimal::from(15)
        );

        Ok(())
    }
}
