//! Derived cart totals.

use lumen_core::{Currency, Money};
use rust_decimal::Decimal;

use crate::config::PricingPolicy;

use super::LineItem;

/// Money amounts derived from the cart contents, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of unit price times quantity over every line.
    pub subtotal: Money,
    /// Flat rate, or zero once the subtotal clears the threshold.
    pub shipping: Money,
    /// Tax on the subtotal (shipping is not taxed).
    pub tax: Money,
    /// Subtotal plus shipping plus tax.
    pub total: Money,
}

impl CartTotals {
    /// Recompute totals from scratch for the given lines.
    ///
    /// Shipping is waived only when the subtotal strictly exceeds the
    /// threshold; a subtotal exactly at the threshold still pays the
    /// flat rate.
    #[must_use]
    pub fn compute(items: &[LineItem], pricing: &PricingPolicy, currency: Currency) -> Self {
        let subtotal: Decimal = items
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity.get()))
            .sum();

        let shipping = if subtotal > pricing.free_shipping_over {
            Decimal::ZERO
        } else {
            pricing.flat_shipping
        };
        let tax = subtotal * pricing.tax_rate;
        let total = subtotal + shipping + tax;

        Self {
            subtotal: Money::new(subtotal, currency),
            shipping: Money::new(shipping, currency),
            tax: Money::new(tax, currency),
            total: Money::new(total, currency),
        }
    }

    /// Whether shipping was waived.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.amount().is_zero()
    }
}
