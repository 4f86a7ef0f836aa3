//! Basket Conditions
//!
//! Predicates over a whole basket, and nested boolean combinations of them.

use std::{fmt, str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{basket::Basket, scope::DiscountScope};

/// Errors raised while building a logical condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    /// A logical composite needs at least one sub-condition.
    #[error("{0} condition needs at least one sub-condition")]
    NoConditions(LogicOp),

    /// The logic kind was not `AND`, `OR` or `XOR`.
    #[error("unknown logic kind: '{0}'")]
    UnknownLogicOp(String),
}

/// Boolean operation used to combine sub-conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// All sub-conditions must hold.
    And,

    /// At least one sub-condition must hold.
    Or,

    /// Exactly one sub-condition must hold.
    Xor,
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        })
    }
}

impl FromStr for LogicOp {
    type Err = ConditionError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "XOR" => Ok(Self::Xor),
            _ => Err(ConditionError::UnknownLogicOp(kind.to_string())),
        }
    }
}

/// Caller-supplied predicate over a basket.
#[derive(Clone)]
pub struct BasketPredicate {
    label: String,
    check: Arc<dyn Fn(&Basket<'_>) -> bool + Send + Sync>,
}

impl BasketPredicate {
    /// Wrap a closure. `label` is only used for debug output.
    pub fn new(
        label: impl Into<String>,
        check: impl Fn(&Basket<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            check: Arc::new(check),
        }
    }

    /// Return the predicate's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn test(&self, basket: &Basket<'_>) -> bool {
        (self.check)(basket)
    }
}

impl fmt::Debug for BasketPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BasketPredicate").field(&self.label).finish()
    }
}

/// A predicate over the whole basket.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Always the given value.
    Constant(bool),

    /// At least `quantity` units across in-scope lines.
    MinQuantity {
        /// Lines counted towards the total.
        scope: DiscountScope,

        /// Minimum number of units.
        quantity: u32,
    },

    /// Undiscounted value of in-scope lines is at least `amount`.
    ///
    /// Totals too large for a `Decimal` count as above any threshold; pricing
    /// such a basket still fails with an overflow error.
    MinSubtotal {
        /// Lines counted towards the total.
        scope: DiscountScope,

        /// Minimum value.
        amount: Decimal,
    },

    /// At least `count` distinct in-scope products are present.
    MinDistinctProducts {
        /// Lines counted towards the total.
        scope: DiscountScope,

        /// Minimum number of distinct products.
        count: usize,
    },

    /// At least `quantity` units across lines whose product name contains `needle`.
    NameContains {
        /// Case-insensitive substring to look for.
        needle: String,

        /// Minimum number of units.
        quantity: u32,
    },

    /// Arbitrary caller-supplied predicate.
    Custom(BasketPredicate),

    /// Nested boolean combination.
    Logical(LogicalCondition),
}

impl Condition {
    /// Build a [`Condition::Custom`] from a closure.
    pub fn custom(
        label: impl Into<String>,
        check: impl Fn(&Basket<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(BasketPredicate::new(label, check))
    }

    /// Evaluate the condition against a basket.
    pub fn is_satisfied_by(&self, basket: &Basket<'_>) -> bool {
        match self {
            Self::Constant(value) => *value,
            Self::MinQuantity { scope, quantity } => {
                let units: u64 = basket
                    .lines()
                    .filter(|line| scope.matches_line(line))
                    .map(|line| u64::from(line.quantity()))
                    .sum();

                units >= u64::from(*quantity)
            }
            Self::MinSubtotal { scope, amount } => {
                let subtotal = basket
                    .lines()
                    .filter(|line| scope.matches_line(line))
                    .fold(Decimal::ZERO, |acc, line| {
                        // An overflowing total is above every representable threshold.
                        let line_total = line.subtotal().unwrap_or(Decimal::MAX);

                        acc.saturating_add(line_total)
                    });

                subtotal >= *amount
            }
            Self::MinDistinctProducts { scope, count } => {
                // Lines are unique per product, so counting lines counts products.
                let present = basket
                    .lines()
                    .filter(|line| line.quantity() > 0 && scope.matches_line(line))
                    .count();

                present >= *count
            }
            Self::NameContains { needle, quantity } => {
                let needle = needle.to_lowercase();
                let units: u64 = basket
                    .lines()
                    .filter(|line| line.product().name.to_lowercase().contains(&needle))
                    .map(|line| u64::from(line.quantity()))
                    .sum();

                units >= u64::from(*quantity)
            }
            Self::Custom(predicate) => predicate.test(basket),
            Self::Logical(logical) => logical.is_satisfied_by(basket),
        }
    }
}

impl From<LogicalCondition> for Condition {
    fn from(logical: LogicalCondition) -> Self {
        Self::Logical(logical)
    }
}

/// A non-empty AND / OR / XOR combination of conditions.
#[derive(Debug, Clone)]
pub struct LogicalCondition {
    op: LogicOp,
    conditions: Vec<Condition>,
}

impl LogicalCondition {
    /// Combine conditions with `op`.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::NoConditions`] if `conditions` is empty.
    pub fn new(
        op: LogicOp,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Result<Self, ConditionError> {
        let conditions: Vec<Condition> = conditions.into_iter().collect();

        if conditions.is_empty() {
            return Err(ConditionError::NoConditions(op));
        }

        Ok(Self { op, conditions })
    }

    /// Combine conditions using a logic kind name (`"AND"`, `"or"`, `"Xor"`, ...).
    ///
    /// # Errors
    ///
    /// - [`ConditionError::UnknownLogicOp`]: `kind` is not a known logic kind.
    /// - [`ConditionError::NoConditions`]: `conditions` is empty.
    pub fn from_kind(
        kind: &str,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Result<Self, ConditionError> {
        Self::new(kind.parse()?, conditions)
    }

    /// Return the boolean operation.
    pub fn op(&self) -> LogicOp {
        self.op
    }

    /// Return the sub-conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the combination against a basket.
    pub fn is_satisfied_by(&self, basket: &Basket<'_>) -> bool {
        let mut results = self
            .conditions
            .iter()
            .map(|condition| condition.is_satisfied_by(basket));

        match self.op {
            LogicOp::And => results.all(|satisfied| satisfied),
            LogicOp::Or => results.any(|satisfied| satisfied),
            LogicOp::Xor => results.filter(|satisfied| *satisfied).take(2).count() == 1,
        }
    }
}
