//! Souk
//!
//! Souk is a discount and pricing resolution engine for marketplace baskets.
//!
//! Rules are a closed tree: flat percentage discounts on a product, category
//! or whole-store scope; AND / OR / XOR composites that are both a condition
//! and a discount; conditional wrappers; and sum, max and sequential
//! combinators. Any rule can be gated behind a coupon code.

pub mod activation;
pub mod basket;
pub mod book;
pub mod catalog;
pub mod categories;
pub mod conditions;
pub mod discounts;
pub mod fixtures;
pub mod percentages;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod scope;
