//! Discounts
//!
//! Every rule, however deeply nested, reduces to one thing: a discount
//! amount per basket line, computed against a set of base line totals.
//! Item totals, basket price maps and aggregate savings are all derived from
//! that at the boundary.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use slotmap::SecondaryMap;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    catalog::Catalog,
    conditions::ConditionError,
    percentages::{PercentageError, fraction},
    pricing::{PricedBasket, PricedLine},
    products::ProductKey,
    scope::DiscountScope,
};

pub mod combinators;
pub mod conditional;
pub mod logical;
pub mod simple;

pub use combinators::{MaxDiscount, SequentialDiscount, SumDiscount, SumOverlap};
pub use conditional::ConditionalDiscount;
pub use logical::LogicalDiscount;
pub use simple::SimpleDiscount;

/// Per-line money amounts, keyed by product.
pub type LineAmounts = SecondaryMap<ProductKey, Decimal>;

/// Errors raised while building a discount rule.
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    /// Invalid or out-of-range percentage.
    #[error(transparent)]
    Percentage(#[from] PercentageError),

    /// Invalid logical condition.
    #[error(transparent)]
    Condition(#[from] ConditionError),

    /// Parallel product / percentage lists differ in length.
    #[error("got {products} products but {percentages} percentages")]
    MismatchedLengths {
        /// Number of products supplied
        products: usize,

        /// Number of percentages supplied
        percentages: usize,
    },
}

/// Errors raised while calculating a discount.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Decimal arithmetic overflowed.
    #[error("discount calculation overflowed for product {0}")]
    Overflow(String),

    /// The basket could not be built or totalled.
    #[error(transparent)]
    Basket(#[from] BasketError),
}

/// A discount rule.
#[derive(Debug, Clone)]
pub enum Discount {
    /// Flat percentage off a scope.
    Simple(SimpleDiscount),

    /// Inner discount gated behind a basket condition.
    Conditional(ConditionalDiscount),

    /// Percentage off a scope when an AND / OR / XOR condition holds.
    Logical(LogicalDiscount),

    /// Independent amounts added together.
    Sum(SumDiscount),

    /// Largest single amount per line.
    Max(MaxDiscount),

    /// Rules applied one after another to the running remainder.
    Sequential(SequentialDiscount),
}

impl Discount {
    /// Final line total for `quantity` units of one product, priced on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or arithmetic overflows.
    pub fn calculate_item(
        &self,
        catalog: &Catalog,
        key: ProductKey,
        quantity: u32,
    ) -> Result<Decimal, DiscountError> {
        let basket = Basket::single(catalog, key, quantity)?;

        Ok(self.price(&basket)?.total())
    }

    /// Total amount saved across the whole basket.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if arithmetic overflows.
    pub fn discount_amount(&self, basket: &Basket<'_>) -> Result<Decimal, DiscountError> {
        Ok(self.price(basket)?.savings())
    }

    /// Final (discounted) line price for every product in the basket.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if arithmetic overflows.
    pub fn calculate_discount_for_basket(
        &self,
        basket: &Basket<'_>,
    ) -> Result<LineAmounts, DiscountError> {
        Ok(self.price(basket)?.final_prices())
    }

    /// Price every line of the basket.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if arithmetic overflows.
    pub fn price(&self, basket: &Basket<'_>) -> Result<PricedBasket, DiscountError> {
        let bases = line_totals(basket)?;
        let amounts = self.line_discounts(basket, &bases)?;

        let lines = basket.lines().map(|line| {
            let original = bases.get(line.key()).copied().unwrap_or(Decimal::ZERO);
            let discount = amounts
                .get(line.key())
                .copied()
                .unwrap_or(Decimal::ZERO)
                .clamp(Decimal::ZERO, original);

            PricedLine::new(line.key(), line.quantity(), original, discount)
        });

        Ok(PricedBasket::new(lines))
    }

    /// Redeem a coupon code across the whole rule tree.
    ///
    /// Returns a new tree; every nested rule waiting for `code` is active in it.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        match self {
            Self::Simple(simple) => Self::Simple(simple.apply_coupon(code)),
            Self::Conditional(conditional) => Self::Conditional(conditional.apply_coupon(code)),
            Self::Logical(logical) => Self::Logical(logical.apply_coupon(code)),
            Self::Sum(sum) => Self::Sum(sum.apply_coupon(code)),
            Self::Max(max) => Self::Max(max.apply_coupon(code)),
            Self::Sequential(sequential) => Self::Sequential(sequential.apply_coupon(code)),
        }
    }

    /// Coupon codes that nested rules are still waiting for.
    pub fn pending_coupons(&self) -> Vec<&str> {
        let mut codes = Vec::new();

        self.collect_pending(&mut codes);

        codes.sort_unstable();
        codes.dedup();

        codes
    }

    fn collect_pending<'a>(&'a self, codes: &mut Vec<&'a str>) {
        match self {
            Self::Simple(simple) => codes.extend(simple.activation().pending_code()),
            Self::Logical(logical) => codes.extend(logical.activation().pending_code()),
            Self::Conditional(conditional) => conditional.inner().collect_pending(codes),
            Self::Sum(sum) => sum.rules().iter().for_each(|rule| rule.collect_pending(codes)),
            Self::Max(max) => max.rules().iter().for_each(|rule| rule.collect_pending(codes)),
            Self::Sequential(sequential) => sequential
                .rules()
                .iter()
                .for_each(|rule| rule.collect_pending(codes)),
        }
    }

    /// Discount amount per line, computed against `bases`.
    ///
    /// Lines the rule doesn't touch are absent from the result.
    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        match self {
            Self::Simple(simple) => simple.line_discounts(basket, bases),
            Self::Conditional(conditional) => conditional.line_discounts(basket, bases),
            Self::Logical(logical) => logical.line_discounts(basket, bases),
            Self::Sum(sum) => sum.line_discounts(basket, bases),
            Self::Max(max) => max.line_discounts(basket, bases),
            Self::Sequential(sequential) => sequential.line_discounts(basket, bases),
        }
    }
}

impl From<SimpleDiscount> for Discount {
    fn from(simple: SimpleDiscount) -> Self {
        Self::Simple(simple)
    }
}

impl From<ConditionalDiscount> for Discount {
    fn from(conditional: ConditionalDiscount) -> Self {
        Self::Conditional(conditional)
    }
}

impl From<LogicalDiscount> for Discount {
    fn from(logical: LogicalDiscount) -> Self {
        Self::Logical(logical)
    }
}

impl From<SumDiscount> for Discount {
    fn from(sum: SumDiscount) -> Self {
        Self::Sum(sum)
    }
}

impl From<MaxDiscount> for Discount {
    fn from(max: MaxDiscount) -> Self {
        Self::Max(max)
    }
}

impl From<SequentialDiscount> for Discount {
    fn from(sequential: SequentialDiscount) -> Self {
        Self::Sequential(sequential)
    }
}

/// Undiscounted total of every basket line.
fn line_totals(basket: &Basket<'_>) -> Result<LineAmounts, DiscountError> {
    let mut totals = LineAmounts::new();

    for line in basket.lines() {
        totals.insert(line.key(), line.subtotal()?);
    }

    Ok(totals)
}

/// Take `percentage` off the base of every in-scope line.
fn percent_off(
    scope: &DiscountScope,
    percentage: Percentage,
    basket: &Basket<'_>,
    bases: &LineAmounts,
) -> Result<LineAmounts, DiscountError> {
    let fraction = fraction(percentage);
    let mut amounts = LineAmounts::new();

    for line in basket.lines().filter(|line| scope.matches_line(line)) {
        let Some(base) = bases.get(line.key()) else {
            continue;
        };

        let amount = base
            .checked_mul(fraction)
            .ok_or_else(|| DiscountError::Overflow(line.product().id.clone()))?;

        amounts.insert(line.key(), amount);
    }

    Ok(amounts)
}
