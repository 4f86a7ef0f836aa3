//! Logical Discount
//!
//! A percentage off a scope that only applies while an AND / OR / XOR
//! combination of basket conditions holds.

use decimal_percentage::Percentage;

use crate::{
    activation::Activation,
    basket::Basket,
    conditions::{Condition, LogicOp, LogicalCondition},
    discounts::{DiscountError, LineAmounts, RuleError, percent_off},
    percentages,
    scope::DiscountScope,
};

/// A logical composite that is both a condition and a discount.
#[derive(Debug, Clone)]
pub struct LogicalDiscount {
    condition: LogicalCondition,
    percentage: Percentage,
    scope: DiscountScope,
    activation: Activation,
}

impl LogicalDiscount {
    /// Create an always-active logical discount.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Percentage`] if `percentage` is outside `0..=1`.
    pub fn new(
        condition: LogicalCondition,
        percentage: Percentage,
        scope: DiscountScope,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            condition,
            percentage: percentages::validate(percentage)?,
            scope,
            activation: Activation::Active,
        })
    }

    /// Create a logical discount that only applies once `code` is redeemed.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Percentage`] if `percentage` is outside `0..=1`.
    pub fn with_coupon(
        condition: LogicalCondition,
        percentage: Percentage,
        scope: DiscountScope,
        code: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            activation: Activation::Pending(code.into()),
            ..Self::new(condition, percentage, scope)?
        })
    }

    /// Build from a logic kind name such as `"AND"`, `"or"` or `"Xor"`.
    ///
    /// # Errors
    ///
    /// - [`RuleError::Condition`]: unknown kind, or no sub-conditions.
    /// - [`RuleError::Percentage`]: `percentage` is outside `0..=1`.
    pub fn from_kind(
        kind: &str,
        conditions: impl IntoIterator<Item = Condition>,
        percentage: Percentage,
        scope: DiscountScope,
        coupon: Option<String>,
    ) -> Result<Self, RuleError> {
        let condition = LogicalCondition::from_kind(kind, conditions)?;

        Ok(Self {
            activation: Activation::from_coupon(coupon),
            ..Self::new(condition, percentage, scope)?
        })
    }

    /// Return the boolean operation
    pub fn op(&self) -> LogicOp {
        self.condition.op()
    }

    /// Return the combined condition
    pub fn condition(&self) -> &LogicalCondition {
        &self.condition
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

    /// Check whether the discount is currently active
    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// Evaluate the combined condition, ignoring activation.
    pub fn is_satisfied_by(&self, basket: &Basket<'_>) -> bool {
        self.condition.is_satisfied_by(basket)
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
        if !self.is_active() || !self.is_satisfied_by(basket) {
            return Ok(LineAmounts::new());
        }

        percent_off(&self.scope, self.percentage, basket, bases)
    }
}

impl From<&LogicalDiscount> for Condition {
    fn from(logical: &LogicalDiscount) -> Self {
        Condition::Logical(logical.condition.clone())
    }
}
