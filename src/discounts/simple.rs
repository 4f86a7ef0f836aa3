//! Simple Discount
//!
//! A flat percentage off every product in scope

use decimal_percentage::Percentage;

use crate::{
    activation::Activation,
    basket::Basket,
    discounts::{DiscountError, LineAmounts, RuleError, percent_off},
    percentages,
    scope::DiscountScope,
};

/// A flat percentage discount on a scope, optionally gated by a coupon.
#[derive(Debug, Clone)]
pub struct SimpleDiscount {
    percentage: Percentage,
    scope: DiscountScope,
    activation: Activation,
}

impl SimpleDiscount {
    /// Create an always-active discount.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Percentage`] if `percentage` is outside `0..=1`.
    pub fn new(percentage: Percentage, scope: DiscountScope) -> Result<Self, RuleError> {
        Ok(Self {
            percentage: percentages::validate(percentage)?,
            scope,
            activation: Activation::Active,
        })
    }

    /// Create a discount that only applies once `code` is redeemed.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Percentage`] if `percentage` is outside `0..=1`.
    pub fn with_coupon(
        percentage: Percentage,
        scope: DiscountScope,
        code: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            activation: Activation::Pending(code.into()),
            ..Self::new(percentage, scope)?
        })
    }

    /// Return the percentage
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Return the scope
    pub fn scope(&self) -> &DiscountScope {
        &self.scope
    }

    /// Return the activation state
    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// Check whether the discount currently applies
    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// Redeem a coupon code, returning the resulting rule.
    #[must_use]
    pub fn apply_coupon(&self, code: &str) -> Self {
        Self {
            activation: self.activation.redeem(code),
            ..self.clone()
        }
    }

    pub(crate) fn line_discounts(
        &self,
        basket: &Basket<'_>,
        bases: &LineAmounts,
    ) -> Result<LineAmounts, DiscountError> {
        if !self.is_active() {
            return Ok(LineAmounts::new());
        }

        percent_off(&self.scope, self.percentage, basket, bases)
    }
}
