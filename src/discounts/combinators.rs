//! Numerical Combinators
//!
//! Merge the results of several independent discounts into one.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::{
    basket::Basket,
    discounts::{Discount, DiscountError, LineAmounts, RuleError, SimpleDiscount},
    products::ProductKey,
    scope::DiscountScope,
};

/// How [`SumDiscount`] treats lines discounted by more than one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SumOverlap {
    /// Add every amount. The combined discount on a line is capped at the line total.
    #[default]
    Stack,

    /// Keep only the first rule (in list order) that discounts the line.
    FirstMatch,
}

/// Adds independently computed discounts together.
#[derive(Debug, Clone)]
pub struct SumDiscount {
    rules: Vec<Discount>,
    overlap: SumOverlap,
}

impl SumDiscount {
    /// Sum `rules`, stacking amounts on overlapping lines.
    pub fn new(rules: Vec<Discount>) -> Self {
        Self::with_overlap(rules, SumOverlap::Stack)
    }

    /// Sum `rules` with an explicit overlap policy.
    pub fn with_overlap(rules: Vec<Discount>, overlap: SumOverlap) -> Self {
        Self { rules, overlap }
    }

    /// Sum of per-product percentage discounts, from parallel lists.
    ///
    /// # Errors
    ///
    /// - [`RuleError::MismatchedLengths`]: the lists differ in length.
    /// - [`RuleError::Percentage`]: a percentage is outside `0..=1`.
    pub fn per_product(
        products: &[ProductKey],
        percentages: &[Percentage],
    ) -> Result<Self, RuleError> {
        if products.len() != percentages.len() {
            return Err(RuleError::MismatchedLengths {
                products: products.len(),
                percentages: percentages.len(),
            });
        }

        let rules = products
            .iter()
            .zip(percentages)
            .map(|(key, percentage)| {
                SimpleDiscount::new(*percentage, DiscountScope::product(*key)).map(Discount::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(rules))
    }

    /// Return the combined rules
    pub fn rules(&self) -> &[Discount] {
        &self.rules
    }

    /// Return the overlap policy
    pub fn overlap(&self) -> SumOverlap {
        self.overlap
    }

    /// Redeem a coupon code in every combined rule.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        Self {
            rules: apply_coupon_all(&self.rules, code),
            overlap: self.overlap,
        }
    }

    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        let mut combined = LineAmounts::new();

        for rule in &self.rules {
            for (key, amount) in rule.line_discounts(basket, bases)? {
                if amount <= Decimal::ZERO {
                    continue;
                }

                if let Some(total) = combined.get_mut(key) {
                    if self.overlap == SumOverlap::Stack {
                        *total = total
                            .checked_add(amount)
                            .ok_or_else(|| overflow(basket, key))?;
                    }
                } else {
                    combined.insert(key, amount);
                }
            }
        }

        for (key, amount) in &mut combined {
            if let Some(base) = bases.get(key) {
                *amount = (*amount).min(*base);
            }
        }

        Ok(combined)
    }
}

/// Keeps the single largest discount for each line.
#[derive(Debug, Clone)]
pub struct MaxDiscount {
    rules: Vec<Discount>,
}

impl MaxDiscount {
    /// Pick the best of `rules` per line.
    pub fn new(rules: Vec<Discount>) -> Self {
        Self { rules }
    }

    /// Return the candidate rules
    pub fn rules(&self) -> &[Discount] {
        &self.rules
    }

    /// Redeem a coupon code in every candidate rule.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        Self {
            rules: apply_coupon_all(&self.rules, code),
        }
    }

    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        let mut best = LineAmounts::new();

        for rule in &self.rules {
            for (key, amount) in rule.line_discounts(basket, bases)? {
                if let Some(current) = best.get_mut(key) {
                    if amount > *current {
                        *current = amount;
                    }
                } else {
                    best.insert(key, amount);
                }
            }
        }

        Ok(best)
    }
}

/// Applies rules one after another, each to what the previous one left.
#[derive(Debug, Clone)]
pub struct SequentialDiscount {
    rules: Vec<Discount>,
}

impl SequentialDiscount {
    /// Apply `rules` in order.
    pub fn new(rules: Vec<Discount>) -> Self {
        Self { rules }
    }

    /// Return the rules, in application order
    pub fn rules(&self) -> &[Discount] {
        &self.rules
    }

    /// Redeem a coupon code in every rule.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        Self {
            rules: apply_coupon_all(&self.rules, code),
        }
    }

    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        let mut remaining = bases.clone();

        for rule in &self.rules {
            for (key, amount) in rule.line_discounts(basket, &remaining)? {
                if let Some(left) = remaining.get_mut(key) {
                    *left = left
                        .checked_sub(amount)
                        .ok_or_else(|| overflow(basket, key))?
                        .max(Decimal::ZERO);
                }
            }
        }

        let mut applied = LineAmounts::new();

        for (key, base) in bases {
            let left = remaining.get(key).copied().unwrap_or(*base);

            if left < *base {
                applied.insert(key, *base - left);
            }
        }

        Ok(applied)
    }
}

fn apply_coupon_all(rules: &[Discount], code: &str) -> Vec<Discount> {
    rules.iter().map(|rule| rule.apply_coupon(code)).collect()
}

fn overflow(basket: &Basket<'_>, key: ProductKey) -> DiscountError {
    let id = basket
        .line(key)
        .map(|line| line.product().id.clone())
        .unwrap_or_default();

    DiscountError::Overflow(id)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        catalog::Catalog, categories::Categories, percentages::from_points, products::Product,
    };

    use super::*;

    struct Grocer {
        catalog: Catalog,
        yogurt: ProductKey,
        spinach: ProductKey,
    }

    fn grocer() -> Result<Grocer, crate::catalog::CatalogError> {
        let mut catalog = Catalog::new();

        let yogurt = catalog.insert(
            Product::new("yogurt", "Yogurt", Decimal::from(20), "grocer")
                .with_categories(Categories::from_strs(&["dairy"])),
        )?;
        let spinach = catalog.insert(
            Product::new("spinach", "Spinach", Decimal::from(30), "grocer")
                .with_categories(Categories::from_strs(&["vegetables"])),
        )?;

        Ok(Grocer {
            catalog,
            yogurt,
            spinach,
        })
    }

    fn simple(points: u32, scope: DiscountScope) -> Result<Discount, RuleError> {
        Ok(SimpleDiscount::new(from_points(points)?, scope)?.into())
    }

    #[test]
    fn sum_adds_disjoint_scopes() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.yogurt, 2)?.add(grocer.spinach, 2)?;

        let rule = Discount::from(SumDiscount::new(vec![
            simple(10, DiscountScope::category("dairy"))?,
            simple(20, DiscountScope::category("vegetables"))?,
        ]));

        assert_eq!(rule.discount_amount(&basket)?, Decimal::from(16));

        let prices = rule.calculate_discount_for_basket(&basket)?;
        assert_eq!(prices.get(grocer.yogurt), Some(&Decimal::from(36)));
        assert_eq!(prices.get(grocer.spinach), Some(&Decimal::from(48)));

        Ok(())
    }

    #[test]
    fn sum_stacks_overlapping_scopes_by_default() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.yogurt, 1)?;

        let rules = vec![
            simple(10, DiscountScope::category("dairy"))?,
            simple(20, DiscountScope::store())?,
        ];

        let stacked = Discount::from(SumDiscount::new(rules.clone()));
        let first = Discount::from(SumDiscount::with_overlap(rules, SumOverlap::FirstMatch));

        assert_eq!(stacked.discount_amount(&basket)?, Decimal::from(6));
        assert_eq!(first.discount_amount(&basket)?, Decimal::from(2));

        Ok(())
    }

    #[test]
    fn stacked_sum_never_goes_below_zero() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.spinach, 1)?;

        let rule = Discount::from(SumDiscount::new(vec![
            simple(70, DiscountScope::store())?,
            simple(60, DiscountScope::category("vegetables"))?,
        ]));

        assert_eq!(
            rule.calculate_item(&grocer.catalog, grocer.spinach, 1)?,
            Decimal::ZERO
        );

        Ok(())
    }

    #[test]
    fn per_product_rejects_mismatched_lists() -> TestResult {
        let grocer = grocer()?;

        let result =
            SumDiscount::per_product(&[grocer.yogurt, grocer.spinach], &[from_points(5)?]);

        assert!(matches!(
            result,
            Err(RuleError::MismatchedLengths {
                products: 2,
                percentages: 1
            })
        ));

        Ok(())
    }

    #[test]
    fn per_product_builds_one_rule_per_product() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.yogurt, 1)?.add(grocer.spinach, 1)?;

        let sum = SumDiscount::per_product(
            &[grocer.yogurt, grocer.spinach],
            &[from_points(50)?, from_points(10)?],
        )?;

        assert_eq!(sum.rules().len(), 2);
        assert_eq!(sum.overlap(), SumOverlap::Stack);
        assert_eq!(
            Discount::from(sum).discount_amount(&basket)?,
            Decimal::from(13)
        );

        Ok(())
    }

    #[test]
    fn max_keeps_the_best_rule() -> TestResult {
        let grocer = grocer()?;

        let rule = Discount::from(MaxDiscount::new(vec![
            simple(5, DiscountScope::store())?,
            simple(10, DiscountScope::category("vegetables"))?,
        ]));

        assert_eq!(
            rule.calculate_item(&grocer.catalog, grocer.spinach, 2)?,
            Decimal::from(54)
        );
        assert_eq!(
            rule.calculate_item(&grocer.catalog, grocer.yogurt, 1)?,
            Decimal::from(19)
        );

        Ok(())
    }

    #[test]
    fn max_ignores_rules_waiting_for_coupons() -> TestResult {
        let grocer = grocer()?;

        let rule = MaxDiscount::new(vec![
            simple(5, DiscountScope::store())?,
            SimpleDiscount::with_coupon(from_points(50)?, DiscountScope::store(), "BIG")?.into(),
        ]);

        assert_eq!(
            Discount::from(rule.clone()).calculate_item(&grocer.catalog, grocer.yogurt, 1)?,
            Decimal::from(19)
        );
        assert_eq!(
            Discount::from(rule.apply_coupon("BIG")).calculate_item(
                &grocer.catalog,
                grocer.yogurt,
                1
            )?,
            Decimal::from(10)
        );

        Ok(())
    }

    #[test]
    fn unmatched_lines_pay_full_price() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.yogurt, 1)?.add(grocer.spinach, 1)?;

        let bakery = simple(50, DiscountScope::category("bakery"))?;

        for rule in [
            Discount::from(MaxDiscount::new(vec![bakery.clone()])),
            Discount::from(SumDiscount::new(vec![bakery.clone()])),
            Discount::from(SequentialDiscount::new(vec![bakery])),
        ] {
            let prices = rule.calculate_discount_for_basket(&basket)?;

            assert_eq!(prices.get(grocer.yogurt), Some(&Decimal::from(20)));
            assert_eq!(prices.get(grocer.spinach), Some(&Decimal::from(30)));
        }

        Ok(())
    }

    #[test]
    fn sequential_applies_to_the_running_remainder() -> TestResult {
        let mut catalog = Catalog::new();
        let kettle = catalog.insert(
            Product::new("kettle", "Kettle", Decimal::from(100), "homeware")
                .with_categories(Categories::from_strs(&["kitchen"])),
        )?;

        let rule = Discount::from(SequentialDiscount::new(vec![
            simple(5, DiscountScope::category("kitchen"))?,
            simple(20, DiscountScope::store())?,
        ]));

        assert_eq!(rule.calculate_item(&catalog, kettle, 1)?, Decimal::from(76));

        Ok(())
    }

    #[test]
    fn sequential_compounds_instead_of_adding() -> TestResult {
        let grocer = grocer()?;
        let mut basket = Basket::new(&grocer.catalog);
        basket.add(grocer.yogurt, 5)?;

        let rules = vec![
            simple(5, DiscountScope::category("dairy"))?,
            simple(20, DiscountScope::store())?,
        ];

        let sequential = Discount::from(SequentialDiscount::new(rules.clone()));
        let summed = Discount::from(SumDiscount::new(rules));

        assert_eq!(sequential.price(&basket)?.total(), Decimal::from(76));
        assert_eq!(summed.price(&basket)?.total(), Decimal::from(75));

        Ok(())
    }
}
