//! Souk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    activation::Activation,
    basket::{Basket, BasketError, BasketLine},
    book::RuleBook,
    catalog::{Catalog, CatalogError},
    categories::Categories,
    conditions::{BasketPredicate, Condition, ConditionError, LogicOp, LogicalCondition},
    discounts::{
        ConditionalDiscount, Discount, DiscountError, LineAmounts, LogicalDiscount, MaxDiscount,
        RuleError, SequentialDiscount, SimpleDiscount, SumDiscount, SumOverlap,
    },
    fixtures::{Fixture, FixtureError},
    percentages::{PercentageError, parse_percentage},
    pricing::{PricedBasket, PricedLine, PricingError},
    products::{Product, ProductKey},
    scope::DiscountScope,
};
