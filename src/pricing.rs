//! Pricing
//!
//! The outcome of running a discount over a basket.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{catalog::Catalog, discounts::LineAmounts, products::ProductKey};

/// Errors that can occur when writing a priced basket.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A priced line refers to a product missing from the catalog.
    #[error("product {0:?} is missing from the catalog")]
    MissingProduct(ProductKey),

    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A single priced basket line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    product: ProductKey,
    quantity: u32,
    original: Decimal,
    discount: Decimal,
}

impl PricedLine {
    /// Create a priced line.
    pub fn new(product: ProductKey, quantity: u32, original: Decimal, discount: Decimal) -> Self {
        Self {
            product,
            quantity,
            original,
            discount,
        }
    }

    /// Product key
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Units bought
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total before discounts
    pub fn original(&self) -> Decimal {
        self.original
    }

    /// Amount taken off the line
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Line total after discounts
    pub fn total(&self) -> Decimal {
        self.original - self.discount
    }
}

/// Every line of a basket, priced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedBasket {
    lines: SmallVec<[PricedLine; 10]>,
}

impl PricedBasket {
    /// Collect priced lines, keeping their order.
    pub fn new(lines: impl IntoIterator<Item = PricedLine>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
        }
    }

    /// Priced lines, in basket order.
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    /// Priced line for a product, if present.
    pub fn line(&self, product: ProductKey) -> Option<&PricedLine> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Total before discounts.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(PricedLine::original).sum()
    }

    /// Total after discounts.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(PricedLine::total).sum()
    }

    /// Amount saved.
    pub fn savings(&self) -> Decimal {
        self.lines.iter().map(PricedLine::discount).sum()
    }

    /// Amount saved, relative to the subtotal.
    pub fn savings_percent(&self) -> Percentage {
        let subtotal = self.subtotal();

        if subtotal.is_zero() {
            return Percentage::from(Decimal::ZERO);
        }

        Percentage::from(self.savings() / subtotal)
    }

    /// Final price per product.
    pub fn final_prices(&self) -> LineAmounts {
        self.lines
            .iter()
            .map(|line| (line.product, line.total()))
            .collect()
    }

    /// Write the priced basket as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// - [`PricingError::MissingProduct`]: a line's product is not in `catalog`.
    /// - [`PricingError::Io`]: writing to `out` failed.
    pub fn write_to(&self, mut out: impl io::Write, catalog: &Catalog) -> Result<(), PricingError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Categories", "Qty", "Price", "Discount", "Total"]);

        for line in &self.lines {
            let product = catalog
                .get(line.product)
                .ok_or(PricingError::MissingProduct(line.product))?;

            builder.push_record([
                product.name.clone(),
                product.categories.iter().collect::<Vec<_>>().join(", "),
                line.quantity.to_string(),
                line.original.normalize().to_string(),
                line.discount.normalize().to_string(),
                line.total().normalize().to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..6), Alignment::right());

        let savings_points = self.savings_percent() * Decimal::ONE_HUNDRED;

        writeln!(out, "{table}")?;
        writeln!(out, " Subtotal: {}", self.subtotal().normalize())?;
        writeln!(out, " Total:    {}", self.total().normalize())?;
        writeln!(
            out,
            " Savings:  {} ({savings_points:.2}%)",
            self.savings().normalize()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{categories::Categories, percentages::fraction, products::Product};

    use super::*;

    #[test]
    fn totals_add_up() {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();

        let priced = PricedBasket::new([
            PricedLine::new(keys.insert(()), 2, Decimal::from(40), Decimal::from(4)),
            PricedLine::new(keys.insert(()), 1, Decimal::from(60), Decimal::from(12)),
        ]);

        assert_eq!(priced.subtotal(), Decimal::from(100));
        assert_eq!(priced.total(), Decimal::from(84));
        assert_eq!(priced.savings(), Decimal::from(16));
        assert_eq!(fraction(priced.savings_percent()), Decimal::new(16, 2));
    }

    #[test]
    fn empty_basket_has_no_savings() {
        let priced = PricedBasket::default();

        assert_eq!(priced.total(), Decimal::ZERO);
        assert_eq!(fraction(priced.savings_percent()), Decimal::ZERO);
    }

    #[test]
    fn final_prices_are_keyed_by_product() {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();
        let key = keys.insert(());

        let priced = PricedBasket::new([PricedLine::new(
            key,
            3,
            Decimal::from(30),
            Decimal::from(3),
        )]);

        assert_eq!(priced.final_prices().get(key), Some(&Decimal::from(27)));
        assert_eq!(priced.line(key).map(PricedLine::quantity), Some(3));
    }

    #[test]
    fn write_to_renders_names_and_summary() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert(
            Product::new("tea", "Green Tea", Decimal::from(5), "cafe")
                .with_categories(Categories::from_strs(&["Drinks"])),
        )?;

        let priced = PricedBasket::new([PricedLine::new(
            key,
            2,
            Decimal::from(10),
            Decimal::from(1),
        )]);

        let mut out = Vec::new();
        priced.write_to(&mut out, &catalog)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Green Tea"));
        assert!(rendered.contains("drinks"));
        assert!(rendered.contains("Total:    9"));
        assert!(rendered.contains("(10.00%)"));

        Ok(())
    }

    #[test]
    fn write_to_reports_missing_products() {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();
        let key = keys.insert(());

        let priced = PricedBasket::new([PricedLine::new(
            key,
            1,
            Decimal::ONE,
            Decimal::ZERO,
        )]);

        assert!(matches!(
            priced.write_to(Vec::new(), &Catalog::new()),
            Err(PricingError::MissingProduct(_))
        ));
    }
}
