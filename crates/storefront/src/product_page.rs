//! Product detail page state.
//!
//! The detail page shows one product with a quantity stepper. The stepper
//! is clamped to 1 through 10; typed input that does not parse becomes 1.
//! Adding hands the chosen quantity to the cart, and buy-now is an add
//! followed immediately by checkout.

use askama::Template;
use lumen_core::ItemId;

use crate::cart::ProductDescriptor;

/// Most of any one product the detail page will sell per add.
pub const MAX_DETAIL_QUANTITY: u32 = 10;

/// State behind the detail page's stepper and actions.
#[derive(Debug, Clone)]
pub struct ProductPage {
    name: String,
    price_text: String,
    image: String,
    quantity: u32,
}

impl ProductPage {
    /// A detail page for one product, with the stepper at 1.
    pub fn new(
        name: impl Into<String>,
        price_text: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price_text: price_text.into(),
            image: image.into(),
            quantity: 1,
        }
    }

    /// The chosen quantity, always 1 through 10.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cart identity of the displayed product.
    #[must_use]
    pub fn item_id(&self) -> ItemId {
        ItemId::from_name(&self.name)
    }

    /// Step the quantity by a signed delta, clamped to the stepper range.
    pub fn step(&mut self, delta: i64) {
        let next = i64::from(self.quantity) + delta;
        self.quantity = clamp_quantity(next);
    }

    /// Replace the quantity from typed input.
    ///
    /// Unparseable input resets to 1; parseable input is clamped to the
    /// stepper range.
    pub fn set_from_input(&mut self, raw: &str) {
        let parsed = raw.trim().parse::<i64>().unwrap_or(1);
        self.quantity = clamp_quantity(parsed);
    }

    /// The cart handoff for this product.
    #[must_use]
    pub fn descriptor(&self) -> ProductDescriptor {
        ProductDescriptor {
            name: Some(self.name.clone()),
            price_text: Some(self.price_text.clone()),
            image: Some(self.image.clone()),
        }
    }

    /// The stepper and action buttons as a fragment.
    #[must_use]
    pub fn template(&self) -> ProductDetailTemplate {
        let button_label = if self.quantity > 1 {
            format!("Add to cart ({})", self.quantity)
        } else {
            "Add to cart".to_string()
        };
        ProductDetailTemplate {
            quantity: self.quantity,
            button_label,
        }
    }
}

fn clamp_quantity(value: i64) -> u32 {
    u32::try_from(value.clamp(1, i64::from(MAX_DETAIL_QUANTITY))).unwrap_or(1)
}

/// Quantity stepper and add and buy buttons.
#[derive(Template)]
#[template(path = "partials/product_detail.html")]
pub struct ProductDetailTemplate {
    pub quantity: u32,
    pub button_label: String,
}
