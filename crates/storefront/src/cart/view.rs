//! Cart display data and fragment templates.
//!
//! View structs carry pre-formatted strings so templates never touch
//! `Money` or `Quantity` directly.

use askama::Template;

use crate::store::SlotStore;

use super::{CartEngine, CartTotals, LineItem};

/// One cart line, ready for display.
#[derive(Debug, Clone)]
pub struct CartLineView {
    /// Normalized id, used in widget names.
    pub id: String,
    pub name: String,
    pub image: String,
    /// Unit price formatted to two decimals, e.g. `"$59.99"`.
    pub unit_price: String,
    pub quantity: u32,
}

impl From<&LineItem> for CartLineView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            unit_price: item.price.display(),
            quantity: item.quantity.get(),
        }
    }
}

/// The cart panel's line list.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
}

impl<S: SlotStore> From<&CartEngine<S>> for CartView {
    fn from(engine: &CartEngine<S>) -> Self {
        Self {
            items: engine.items().iter().map(CartLineView::from).collect(),
        }
    }
}

/// Totals rows, formatted for display.
#[derive(Debug, Clone)]
pub struct CartTotalsView {
    pub subtotal: String,
    pub shipping: String,
    /// When set, the shipping row reads "Free" instead of an amount.
    pub shipping_free: bool,
    pub tax: String,
    pub total: String,
}

impl From<&CartTotals> for CartTotalsView {
    fn from(totals: &CartTotals) -> Self {
        Self {
            subtotal: totals.subtotal.display(),
            shipping: totals.shipping.display(),
            shipping_free: totals.free_shipping(),
            tax: totals.tax.display(),
            total: totals.total.display(),
        }
    }
}

/// Line items inside the cart panel, or the empty-cart message.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Subtotal, shipping, tax, and total rows.
#[derive(Template)]
#[template(path = "partials/cart_totals.html")]
pub struct CartTotalsTemplate {
    pub totals: CartTotalsView,
}

/// Cart badge in the page header, hidden at zero.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}
