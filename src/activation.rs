//! Coupon Activation
//!
//! A rule either always participates in pricing, or waits for a coupon code.
//! Redeeming returns a new state; an active rule never goes back to pending.

/// Activation state of a leaf or composite rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Activation {
    /// The rule participates in pricing.
    #[default]
    Active,

    /// The rule is waiting for this coupon code.
    Pending(String),
}

impl Activation {
    /// Activation for a rule with an optional coupon requirement.
    pub fn from_coupon(code: Option<String>) -> Self {
        code.map_or(Self::Active, Self::Pending)
    }

    /// Check whether the rule currently participates in pricing.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The coupon code still required, if any.
    pub fn pending_code(&self) -> Option<&str> {
        match self {
            Self::Active => None,
            Self::Pending(code) => Some(code),
        }
    }

    /// Redeem a coupon code, returning the resulting state.
    ///
    /// A code that doesn't match leaves the state unchanged.
    #[must_use]
    pub fn redeem(&self, code: &str) -> Self {
        match self {
            Self::Pending(expected) if expected == code => Self::Active,
            other => other.clone(),
        }
    }
}
