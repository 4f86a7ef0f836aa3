//! Discount Fixtures
//!
//! YAML shape of a discount rule tree. Product references are catalog ids and
//! are resolved when the tree is built.

use decimal_percentage::Percentage;
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    conditions::{Condition, LogicalCondition},
    discounts::{
        ConditionalDiscount, Discount, LogicalDiscount, MaxDiscount, SequentialDiscount,
        SimpleDiscount, SumDiscount, SumOverlap,
    },
    fixtures::{FixtureError, products::parse_price},
    percentages::parse_percentage,
    products::ProductKey,
    scope::DiscountScope,
};

/// Percentage from YAML, either a bare fraction (`0.25`) or a string (`"25%"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PercentageFixture {
    /// Fraction between 0 and 1
    Fraction(f64),

    /// String form, with or without a `%` suffix
    Text(String),
}

impl PercentageFixture {
    /// Parse and range-check the percentage.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPercentage`] if the value is not a number
    /// between 0% and 100%.
    pub fn parse(&self) -> Result<Percentage, FixtureError> {
        let value = match self {
            Self::Fraction(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        };

        parse_percentage(&value).map_err(|_err| FixtureError::InvalidPercentage(value))
    }
}

/// Discount scope from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScopeFixture {
    /// A single product, by catalog id
    Product {
        /// Product id
        id: String,
    },

    /// Every product in a category
    Category {
        /// Category name
        name: String,
    },

    /// Every product
    Store,
}

impl ScopeFixture {
    fn resolve(&self, catalog: &Catalog) -> Result<DiscountScope, FixtureError> {
        match self {
            Self::Product { id } => Ok(DiscountScope::product(product_key(catalog, id)?)),
            Self::Category { name } => Ok(DiscountScope::category(name)),
            Self::Store => Ok(DiscountScope::store()),
        }
    }
}

/// Basket condition from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionFixture {
    /// Fixed outcome
    Constant {
        /// Value the condition always has
        value: bool,
    },

    /// Minimum units in scope
    MinQuantity {
        /// Lines counted
        scope: ScopeFixture,

        /// Minimum number of units
        quantity: u32,
    },

    /// Minimum undiscounted value in scope
    MinSubtotal {
        /// Lines counted
        scope: ScopeFixture,

        /// Minimum value (e.g., "50.00")
        amount: String,
    },

    /// Minimum distinct products in scope
    MinDistinctProducts {
        /// Lines counted
        scope: ScopeFixture,

        /// Minimum number of products
        count: usize,
    },

    /// Minimum units whose product name contains a substring
    NameContains {
        /// Substring to look for
        needle: String,

        /// Minimum number of units
        #[serde(default = "one")]
        quantity: u32,
    },

    /// AND / OR / XOR of nested conditions
    Logical {
        /// Logic kind (`and`, `or`, `xor`)
        kind: String,

        /// Nested conditions
        conditions: Vec<ConditionFixture>,
    },
}

fn one() -> u32 {
    1
}

impl ConditionFixture {
    /// Build the condition, resolving product ids against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is unknown, an amount cannot be parsed or a
    /// logical condition is malformed.
    pub fn build(&self, catalog: &Catalog) -> Result<Condition, FixtureError> {
        Ok(match self {
            Self::Constant { value } => Condition::Constant(*value),
            Self::MinQuantity { scope, quantity } => Condition::MinQuantity {
                scope: scope.resolve(catalog)?,
                quantity: *quantity,
            },
            Self::MinSubtotal { scope, amount } => Condition::MinSubtotal {
                scope: scope.resolve(catalog)?,
                amount: parse_price(amount)?,
            },
            Self::MinDistinctProducts { scope, count } => Condition::MinDistinctProducts {
                scope: scope.resolve(catalog)?,
                count: *count,
            },
            Self::NameContains { needle, quantity } => Condition::NameContains {
                needle: needle.clone(),
                quantity: *quantity,
            },
            Self::Logical { kind, conditions } => {
                let conditions = build_conditions(conditions, catalog)?;

                Condition::Logical(
                    LogicalCondition::from_kind(kind, conditions)
                        .map_err(|err| FixtureError::Rule(err.into()))?,
                )
            }
        })
    }
}

/// Overlap policy for sum rules
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapFixture {
    /// Add amounts on shared lines
    #[default]
    Stack,

    /// First discounting rule wins a shared line
    FirstMatch,
}

impl From<OverlapFixture> for SumOverlap {
    fn from(overlap: OverlapFixture) -> Self {
        match overlap {
            OverlapFixture::Stack => SumOverlap::Stack,
            OverlapFixture::FirstMatch => SumOverlap::FirstMatch,
        }
    }
}

/// Discount rule from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Flat percentage off a scope
    Simple {
        /// Percentage off
        percentage: PercentageFixture,

        /// Products affected
        scope: ScopeFixture,

        /// Coupon code required to activate the rule
        #[serde(default)]
        coupon: Option<String>,
    },

    /// Percentage off a scope while a logical condition holds
    Logical {
        /// Logic kind (`and`, `or`, `xor`)
        kind: String,

        /// Combined conditions
        conditions: Vec<ConditionFixture>,

        /// Percentage off
        percentage: PercentageFixture,

        /// Products affected
        scope: ScopeFixture,

        /// Coupon code required to activate the rule
        #[serde(default)]
        coupon: Option<String>,
    },

    /// Nested discount gated by a condition
    Conditional {
        /// Gating condition
        condition: ConditionFixture,

        /// Gated discount
        discount: Box<DiscountFixture>,
    },

    /// Sum of nested discounts
    Sum {
        /// Nested discounts
        rules: Vec<DiscountFixture>,

        /// Treatment of lines hit by several rules
        #[serde(default)]
        overlap: OverlapFixture,
    },

    /// Sum of per-product percentages from parallel lists
    PerProduct {
        /// Product ids
        products: Vec<String>,

        /// Percentage for each product, in the same order
        percentages: Vec<PercentageFixture>,
    },

    /// Largest nested discount per line
    Max {
        /// Nested discounts
        rules: Vec<DiscountFixture>,
    },

    /// Nested discounts applied one after another
    Sequential {
        /// Nested discounts, in application order
        rules: Vec<DiscountFixture>,
    },
}

impl DiscountFixture {
    /// Build the rule tree, resolving product ids against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is unknown, a percentage is invalid or a
    /// rule cannot be constructed.
    pub fn build(&self, catalog: &Catalog) -> Result<Discount, FixtureError> {
        Ok(match self {
            Self::Simple {
                percentage,
                scope,
                coupon,
            } => {
                let percentage = percentage.parse()?;
                let scope = scope.resolve(catalog)?;

                let simple = match coupon {
                    Some(code) => SimpleDiscount::with_coupon(percentage, scope, code.as_str())?,
                    None => SimpleDiscount::new(percentage, scope)?,
                };

                simple.into()
            }
            Self::Logical {
                kind,
                conditions,
                percentage,
                scope,
                coupon,
            } => LogicalDiscount::from_kind(
                kind,
                build_conditions(conditions, catalog)?,
                percentage.parse()?,
                scope.resolve(catalog)?,
                coupon.clone(),
            )?
            .into(),
            Self::Conditional {
                condition,
                discount,
            } => ConditionalDiscount::new(condition.build(catalog)?, discount.build(catalog)?)
                .into(),
            Self::Sum { rules, overlap } => {
                SumDiscount::with_overlap(build_rules(rules, catalog)?, (*overlap).into()).into()
            }
            Self::PerProduct {
                products,
                percentages,
            } => {
                let keys = products
                    .iter()
                    .map(|id| product_key(catalog, id))
                    .collect::<Result<Vec<_>, _>>()?;
                let percentages = percentages
                    .iter()
                    .map(PercentageFixture::parse)
                    .collect::<Result<Vec<_>, _>>()?;

                SumDiscount::per_product(&keys, &percentages)?.into()
            }
            Self::Max { rules } => MaxDiscount::new(build_rules(rules, catalog)?).into(),
            Self::Sequential { rules } => {
                SequentialDiscount::new(build_rules(rules, catalog)?).into()
            }
        })
    }
}

fn build_rules(rules: &[DiscountFixture], catalog: &Catalog) -> Result<Vec<Discount>, FixtureError> {
    rules.iter().map(|rule| rule.build(catalog)).collect()
}

fn build_conditions(
    conditions: &[ConditionFixture],
    catalog: &Catalog,
) -> Result<Vec<Condition>, FixtureError> {
    conditions
        .iter()
        .map(|condition| condition.build(catalog))
        .collect()
}

fn product_key(catalog: &Catalog, id: &str) -> Result<ProductKey, FixtureError> {
    catalog
        .key_of(id)
        .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
}
