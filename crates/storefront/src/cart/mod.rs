//! The shopping cart state machine.
//!
//! One cart exists per page load. It restores itself from the session
//! store on construction, merges duplicate products by normalized-name
//! identity, keeps every quantity at one or more, and persists after every
//! mutation. Checkout snapshots the cart into a separate slot and leaves
//! the live cart untouched.

mod totals;
mod view;

pub use totals::CartTotals;
pub use view::{
    CartCountTemplate, CartItemsTemplate, CartLineView, CartTotalsTemplate, CartTotalsView,
    CartView,
};

use lumen_core::{Currency, ItemId, Money, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PLACEHOLDER_IMAGE;
use crate::config::PricingPolicy;
use crate::store::{SlotStore, StoreError, slots};

/// Display name used when a handoff carries no name.
const FALLBACK_NAME: &str = "Product";

/// Product data handed to the cart by a catalog card or detail page.
///
/// Every field is optional; the cart substitutes placeholders rather than
/// reject the add.
#[derive(Debug, Clone, Default)]
pub struct ProductDescriptor {
    pub name: Option<String>,
    /// Price as rendered text, e.g. `"$59.99"`. Parsed leniently.
    pub price_text: Option<String>,
    pub image: Option<String>,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Identity derived from the normalized product name.
    pub id: ItemId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub quantity: Quantity,
}

/// Wire form of a line item, as written to the session store.
///
/// The price travels as a bare decimal string; the currency is ambient
/// (a configuration concern, not per-line state). A record with a zero
/// quantity fails deserialization outright.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    id: ItemId,
    name: String,
    price: Decimal,
    image: String,
    quantity: Quantity,
}

impl From<&LineItem> for StoredLine {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price.amount(),
            image: item.image.clone(),
            quantity: item.quantity,
        }
    }
}

impl StoredLine {
    fn into_line_item(self, currency: Currency) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            price: Money::new(self.price, currency),
            image: self.image,
            quantity: self.quantity,
        }
    }
}

/// What a cart mutation did to the targeted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added { name: String },
    /// An existing line absorbed the add.
    Increased { name: String },
    /// The line's quantity changed.
    Updated { name: String, quantity: u32 },
    /// The line left the cart.
    Removed { name: String },
    /// No line matched; nothing happened.
    NotFound,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to check out; the shopper stays on the page.
    EmptyCart,
    /// The snapshot could not be written; the handoff was aborted.
    SnapshotFailed,
    /// The snapshot is in place and navigation should proceed.
    HandedOff,
}

/// A point-in-time read of the cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSummary<'a> {
    pub items: &'a [LineItem],
    /// Sum of quantities, not line count.
    pub item_count: u32,
    pub total_price: Money,
}

/// The cart engine.
///
/// Generic over the session store so tests run against [`MemoryStore`]
/// while the page runs against redb.
///
/// [`MemoryStore`]: crate::store::MemoryStore
#[derive(Debug)]
pub struct CartEngine<S: SlotStore> {
    items: Vec<LineItem>,
    store: S,
    currency: Currency,
    pricing: PricingPolicy,
}

impl<S: SlotStore> CartEngine<S> {
    /// Build a cart by restoring whatever the session store holds.
    ///
    /// Anything short of a well-formed snapshot (missing slot aside) is
    /// treated as no cart at all: unreadable backend, malformed JSON, a
    /// zero quantity, a negative price, or two lines sharing an id. The
    /// shopper gets an empty cart, never a crash.
    pub fn restore(store: S, currency: Currency, pricing: PricingPolicy) -> Self {
        let items = match store.get(slots::CART) {
            Ok(Some(raw)) => match parse_stored_cart(&raw, currency) {
                Some(items) => items,
                None => {
                    tracing::warn!("discarding malformed cart snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cart slot unreadable, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(lines = items.len(), "cart restored");
        Self {
            items,
            store,
            currency,
            pricing,
        }
    }

    /// Add a product to the cart.
    ///
    /// Identity is the normalized name: an add whose name slugs to an
    /// existing line bumps that line's quantity instead of appending.
    /// Missing descriptor fields fall back to placeholders, and the price
    /// text is parsed leniently (`"$1,299.99"` works, garbage is zero).
    pub fn add_item(&mut self, descriptor: ProductDescriptor) -> CartChange {
        let name = descriptor
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());
        let id = ItemId::from_name(&name);

        let change = if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            if let Some(bumped) = item.quantity.checked_apply(1) {
                item.quantity = bumped;
            }
            CartChange::Increased {
                name: item.name.clone(),
            }
        } else {
            let price = Money::parse_lenient(
                descriptor.price_text.as_deref().unwrap_or_default(),
                self.currency,
            );
            self.items.push(LineItem {
                id,
                name: name.clone(),
                price,
                image: descriptor
                    .image
                    .filter(|image| !image.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                quantity: Quantity::ONE,
            });
            CartChange::Added { name }
        };

        self.persist_logged();
        change
    }

    /// Adjust a line's quantity by a signed delta.
    ///
    /// Dropping to zero or below removes the line. An id with no line is
    /// a no-op that touches nothing, not even the store.
    pub fn change_quantity(&mut self, id: &ItemId, delta: i64) -> CartChange {
        let Some(index) = self.items.iter().position(|item| item.id == *id) else {
            return CartChange::NotFound;
        };
        let Some(item) = self.items.get_mut(index) else {
            return CartChange::NotFound;
        };

        let change = match item.quantity.checked_apply(delta) {
            Some(quantity) => {
                item.quantity = quantity;
                CartChange::Updated {
                    name: item.name.clone(),
                    quantity: quantity.get(),
                }
            }
            None => {
                let removed = self.items.remove(index);
                CartChange::Removed { name: removed.name }
            }
        };

        self.persist_logged();
        change
    }

    /// Set a line's quantity outright.
    ///
    /// Zero or negative removes the line; any positive value is stored
    /// verbatim. An id with no line is a no-op.
    pub fn set_quantity(&mut self, id: &ItemId, value: i64) -> CartChange {
        if value <= 0 {
            return self.remove_item(id);
        }

        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return CartChange::NotFound;
        };

        let clamped = u32::try_from(value).unwrap_or(u32::MAX);
        if let Some(quantity) = Quantity::new(clamped) {
            item.quantity = quantity;
        }
        let change = CartChange::Updated {
            name: item.name.clone(),
            quantity: clamped,
        };

        self.persist_logged();
        change
    }

    /// Remove a line entirely.
    pub fn remove_item(&mut self, id: &ItemId) -> CartChange {
        let Some(index) = self.items.iter().position(|item| item.id == *id) else {
            return CartChange::NotFound;
        };

        let removed = self.items.remove(index);
        self.persist_logged();
        CartChange::Removed { name: removed.name }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist_logged();
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across every line.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity.get()))
    }

    /// Snapshot the cart's contents and derived count and price.
    #[must_use]
    pub fn summarize(&self) -> CartSummary<'_> {
        CartSummary {
            items: &self.items,
            item_count: self.item_count(),
            total_price: self.totals().total,
        }
    }

    /// Derive subtotal, shipping, tax, and total from the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.items, &self.pricing, self.currency)
    }

    /// Hand the cart off to checkout.
    ///
    /// Writes a snapshot of the current lines into the checkout slot and
    /// reports [`CheckoutOutcome::HandedOff`] so the caller can navigate.
    /// The live cart is deliberately left intact; clearing it is the
    /// checkout page's decision, not ours.
    pub fn checkout(&mut self) -> CheckoutOutcome {
        if self.items.is_empty() {
            return CheckoutOutcome::EmptyCart;
        }

        match self.persist_to(slots::CHECKOUT_PENDING) {
            Ok(()) => {
                tracing::info!(lines = self.items.len(), "checkout snapshot written");
                CheckoutOutcome::HandedOff
            }
            Err(e) => {
                tracing::error!(error = %e, "checkout snapshot failed, handoff aborted");
                CheckoutOutcome::SnapshotFailed
            }
        }
    }

    /// Write the current lines into the cart slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend rejects the write. In-memory
    /// state is already updated by then; the cart keeps working for the
    /// rest of the page load.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.persist_to(slots::CART)
    }

    /// The raw snapshot awaiting the checkout page, if a handoff happened.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend cannot be read.
    pub fn pending_checkout(&self) -> Result<Option<String>, StoreError> {
        self.store.get(slots::CHECKOUT_PENDING)
    }

    /// Consume the engine and hand back its slot store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist_to(&mut self, slot: &str) -> Result<(), StoreError> {
        let stored: Vec<StoredLine> = self.items.iter().map(StoredLine::from).collect();
        let json = serde_json::to_string(&stored)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.put(slot, &json)
    }

    fn persist_logged(&mut self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "cart persist failed, continuing in memory");
        }
    }
}

/// Parse and validate a stored cart snapshot.
///
/// Returns `None` for malformed JSON or for well-formed JSON that breaks
/// a cart invariant (duplicate ids, negative prices). Zero quantities are
/// already rejected at the serde layer.
fn parse_stored_cart(raw: &str, currency: Currency) -> Option<Vec<LineItem>> {
    let stored: Vec<StoredLine> = serde_json::from_str(raw).ok()?;

    let mut seen = std::collections::HashSet::new();
    for line in &stored {
        if line.price.is_sign_negative() || !seen.insert(line.id.clone()) {
            return None;
        }
    }

    Some(
        stored
            .into_iter()
            .map(|line| line.into_line_item(currency))
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crate::store::MemoryStore;

    use super::*;

    fn empty_cart() -> CartEngine<MemoryStore> {
        CartEngine::restore(MemoryStore::new(), Currency::USD, PricingPolicy::default())
    }

    fn descriptor(name: &str, price_text: &str) -> ProductDescriptor {
        ProductDescriptor {
            name: Some(name.to_string()),
            price_text: Some(price_text.to_string()),
            image: Some(format!("images/{name}.jpg")),
        }
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut cart = empty_cart();
        let change = cart.add_item(descriptor("Aviator Sol", "$59.99"));

        assert_eq!(
            change,
            CartChange::Added {
                name: "Aviator Sol".to_string()
            }
        );
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].price.display(), "$59.99");
        assert_eq!(cart.items()[0].quantity.get(), 1);
    }

    #[test]
    fn test_add_merges_by_normalized_name() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Aviator Sol", "$59.99"));
        let change = cart.add_item(descriptor("aviator  SOL", "$59.99"));

        assert_eq!(
            change,
            CartChange::Increased {
                name: "Aviator Sol".to_string()
            }
        );
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 2);
        // The first spelling wins
        assert_eq!(cart.items()[0].name, "Aviator Sol");
    }

    #[test]
    fn test_merge_preserves_insertion_order() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("First", "$10"));
        cart.add_item(descriptor("Second", "$20"));
        cart.add_item(descriptor("first", "$10"));

        let names: Vec<&str> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(cart.items()[0].quantity.get(), 2);
    }

    #[test]
    fn test_add_with_empty_descriptor_uses_placeholders() {
        let mut cart = empty_cart();
        cart.add_item(ProductDescriptor::default());

        let item = &cart.items()[0];
        assert_eq!(item.name, "Product");
        assert_eq!(item.price.display(), "$0.00");
        assert_eq!(item.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_add_parses_price_text_leniently() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Gran Lujo", "$1,299.99"));
        assert_eq!(cart.items()[0].price.display(), "$1299.99");
    }

    #[test]
    fn test_add_with_blank_name_uses_fallback() {
        let mut cart = empty_cart();
        cart.add_item(ProductDescriptor {
            name: Some("   ".to_string()),
            price_text: None,
            image: Some(String::new()),
        });

        assert_eq!(cart.items()[0].name, "Product");
        assert_eq!(cart.items()[0].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_change_quantity_increments_and_decrements() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Retro", "$79.99"));
        let id = cart.items()[0].id.clone();

        assert_eq!(
            cart.change_quantity(&id, 1),
            CartChange::Updated {
                name: "Retro".to_string(),
                quantity: 2
            }
        );
        assert_eq!(
            cart.change_quantity(&id, -1),
            CartChange::Updated {
                name: "Retro".to_string(),
                quantity: 1
            }
        );
    }

    #[test]
    fn test_decrement_below_one_removes_line() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Retro", "$79.99"));
        let id = cart.items()[0].id.clone();

        let change = cart.change_quantity(&id, -1);
        assert_eq!(
            change,
            CartChange::Removed {
                name: "Retro".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_on_unknown_id_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Retro", "$79.99"));

        let ghost = ItemId::from_name("Not In Cart");
        assert_eq!(cart.change_quantity(&ghost, 1), CartChange::NotFound);
        assert_eq!(cart.items()[0].quantity.get(), 1);
    }

    #[test]
    fn test_set_quantity_stores_value_verbatim() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Retro", "$79.99"));
        let id = cart.items()[0].id.clone();

        cart.set_quantity(&id, 7);
        assert_eq!(cart.items()[0].quantity.get(), 7);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Retro", "$79.99"));
        let id = cart.items()[0].id.clone();

        assert_eq!(
            cart.set_quantity(&id, 0),
            CartChange::Removed {
                name: "Retro".to_string()
            }
        );

        cart.add_item(descriptor("Retro", "$79.99"));
        let id = cart.items()[0].id.clone();
        assert_eq!(
            cart.set_quantity(&id, -5),
            CartChange::Removed {
                name: "Retro".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_unknown_id_is_noop() {
        let mut cart = empty_cart();
        let ghost = ItemId::from_name("ghost");
        assert_eq!(cart.set_quantity(&ghost, 0), CartChange::NotFound);
        assert_eq!(cart.set_quantity(&ghost, 3), CartChange::NotFound);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("A", "$10"));
        cart.add_item(descriptor("B", "$20"));
        let id = cart.items()[0].id.clone();

        assert_eq!(
            cart.remove_item(&id),
            CartChange::Removed {
                name: "A".to_string()
            }
        );
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.remove_item(&id), CartChange::NotFound);
    }

    #[test]
    fn test_summarize_counts_quantities_not_lines() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("A", "$10.00"));
        cart.add_item(descriptor("A", "$10.00"));
        cart.add_item(descriptor("B", "$5.50"));

        let summary = cart.summarize();
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.item_count, 3);
        // subtotal 25.50, shipping 10, tax 2.55
        assert_eq!(summary.total_price.display(), "$38.05");
    }

    #[test]
    fn test_clear_empties_cart_and_store() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("A", "$10"));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.store.get(slots::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persist_then_restore_roundtrip() {
        let mut store = MemoryStore::new();
        {
            let mut cart =
                CartEngine::restore(&mut store, Currency::USD, PricingPolicy::default());
            cart.add_item(descriptor("Aviator Sol", "$59.99"));
            cart.add_item(descriptor("Retro", "$79.99"));
            cart.add_item(descriptor("Aviator Sol", "$59.99"));
        }

        let cart = CartEngine::restore(&mut store, Currency::USD, PricingPolicy::default());
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].name, "Aviator Sol");
        assert_eq!(cart.items()[0].quantity.get(), 2);
        assert_eq!(cart.items()[0].price.display(), "$59.99");
        assert_eq!(cart.items()[1].name, "Retro");
    }

    #[test]
    fn test_restore_from_malformed_json_starts_empty() {
        let mut store = MemoryStore::new();
        store.put(slots::CART, "definitely not json {{").unwrap();

        let cart = CartEngine::restore(store, Currency::USD, PricingPolicy::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_zero_quantity() {
        let mut store = MemoryStore::new();
        store
            .put(
                slots::CART,
                r#"[{"id":"x","name":"X","price":"10.00","image":"i.jpg","quantity":0}]"#,
            )
            .unwrap();

        let cart = CartEngine::restore(store, Currency::USD, PricingPolicy::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_negative_price() {
        let mut store = MemoryStore::new();
        store
            .put(
                slots::CART,
                r#"[{"id":"x","name":"X","price":"-5.00","image":"i.jpg","quantity":1}]"#,
            )
            .unwrap();

        let cart = CartEngine::restore(store, Currency::USD, PricingPolicy::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let mut store = MemoryStore::new();
        store
            .put(
                slots::CART,
                r#"[{"id":"x","name":"X","price":"1.00","image":"i.jpg","quantity":1},
                    {"id":"x","name":"X2","price":"2.00","image":"i.jpg","quantity":1}]"#,
            )
            .unwrap();

        let cart = CartEngine::restore(store, Currency::USD, PricingPolicy::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_on_empty_cart_aborts() {
        let mut cart = empty_cart();
        assert_eq!(cart.checkout(), CheckoutOutcome::EmptyCart);
        assert_eq!(cart.store.get(slots::CHECKOUT_PENDING).unwrap(), None);
    }

    #[test]
    fn test_checkout_snapshots_without_clearing() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Aviator Sol", "$59.99"));

        assert_eq!(cart.checkout(), CheckoutOutcome::HandedOff);
        assert_eq!(cart.items().len(), 1);

        let snapshot = cart.store.get(slots::CHECKOUT_PENDING).unwrap().unwrap();
        assert!(snapshot.contains("aviator-sol"));
        assert!(snapshot.contains("59.99"));
    }

    #[test]
    fn test_mutations_survive_store_failure() {
        struct FailingStore;
        impl SlotStore for FailingStore {
            fn get(&self, _slot: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::Backend("offline".to_string()))
            }
            fn put(&mut self, _slot: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::Backend("offline".to_string()))
            }
            fn remove(&mut self, _slot: &str) -> Result<(), StoreError> {
                Err(StoreError::Backend("offline".to_string()))
            }
        }

        let mut cart = CartEngine::restore(FailingStore, Currency::USD, PricingPolicy::default());
        assert!(cart.is_empty());

        cart.add_item(descriptor("A", "$10"));
        assert_eq!(cart.items().len(), 1);
        assert!(cart.persist().is_err());
        assert_eq!(cart.checkout(), CheckoutOutcome::SnapshotFailed);
    }

    #[test]
    fn test_stored_wire_format() {
        let mut cart = empty_cart();
        cart.add_item(descriptor("Aviator Sol", "$59.99"));

        let raw = cart.store.get(slots::CART).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], "aviator-sol");
        assert_eq!(value[0]["name"], "Aviator Sol");
        assert_eq!(value[0]["price"], "59.99");
        assert_eq!(value[0]["quantity"], 1);
    }
}
