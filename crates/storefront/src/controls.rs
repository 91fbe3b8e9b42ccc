//! Widget bindings.
//!
//! The page registers what each named widget does; dispatch looks the
//! widget up and applies its binding. Widgets that repeat with their
//! fragment (cart lines, catalog cards, suggestions) belong to a group
//! and are rebound wholesale after each render, so a widget from a stale
//! fragment can never fire.

use std::collections::HashMap;

use lumen_core::{ItemId, ProductId};

/// Canonical widget names, shared by the templates and the dispatcher.
pub mod widget {
    use lumen_core::{ItemId, ProductId};

    pub const CART_ICON: &str = "cart-icon";
    pub const CART_CLOSE: &str = "cart-close";
    pub const CART_CONTINUE: &str = "cart-continue";
    pub const CART_CHECKOUT: &str = "cart-checkout";
    pub const SEARCH_BOX: &str = "product-search";
    pub const CLEAR_SEARCH: &str = "clear-search";
    pub const CATEGORY_SELECT: &str = "category-filter";
    pub const PRICE_SELECT: &str = "price-filter";
    pub const SORT_SELECT: &str = "sort-filter";
    pub const CLEAR_FILTERS: &str = "clear-filters";
    pub const DETAIL_QTY_INPUT: &str = "quantity";
    pub const DETAIL_QTY_MINUS: &str = "qty-minus";
    pub const DETAIL_QTY_PLUS: &str = "qty-plus";
    pub const DETAIL_ADD: &str = "add-to-cart";
    pub const DETAIL_BUY_NOW: &str = "buy-now";

    #[must_use]
    pub fn cart_increase(id: &ItemId) -> String {
        format!("cart-increase:{id}")
    }

    #[must_use]
    pub fn cart_decrease(id: &ItemId) -> String {
        format!("cart-decrease:{id}")
    }

    #[must_use]
    pub fn cart_quantity(id: &ItemId) -> String {
        format!("cart-quantity:{id}")
    }

    #[must_use]
    pub fn cart_remove(id: &ItemId) -> String {
        format!("cart-remove:{id}")
    }

    #[must_use]
    pub fn card_add(id: ProductId) -> String {
        format!("card-add:{id}")
    }

    #[must_use]
    pub fn suggestion(id: ProductId) -> String {
        format!("suggestion:{id}")
    }
}

/// Something a click can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenCartPanel,
    CloseCartPanel,
    AddFromCatalog(ProductId),
    ChooseSuggestion(ProductId),
    IncrementLine(ItemId),
    DecrementLine(ItemId),
    RemoveLine(ItemId),
    ClearCart,
    Checkout,
    ClearSearch,
    ClearFilters,
    IncrementDetailQuantity,
    DecrementDetailQuantity,
    AddDetailToCart,
    BuyNow,
}

/// Something a value change can land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    SearchBox,
    CategorySelect,
    PriceSelect,
    SortSelect,
    LineQuantity(ItemId),
    DetailQuantity,
}

/// What a widget is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Fires on click.
    Activate(Action),
    /// Receives value changes.
    Edit(EditTarget),
}

/// Which rebind pass owns a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingGroup {
    /// Bound once at page assembly.
    Fixed,
    /// Rebound when the cart panel re-renders.
    CartLines,
    /// Rebound when the product grid re-renders.
    CatalogCards,
    /// Rebound when the suggestion dropdown re-renders.
    Suggestions,
}

/// The widget registry.
#[derive(Debug, Default)]
pub struct Controls {
    bindings: HashMap<String, (BindingGroup, Binding)>,
}

impl Controls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a widget. Rebinding a name replaces the old binding.
    pub fn bind(&mut self, widget: impl Into<String>, group: BindingGroup, binding: Binding) {
        self.bindings.insert(widget.into(), (group, binding));
    }

    /// Drop a group's bindings and install a fresh set.
    pub fn rebind_group(
        &mut self,
        group: BindingGroup,
        bindings: impl IntoIterator<Item = (String, Binding)>,
    ) {
        self.bindings.retain(|_, (owner, _)| *owner != group);
        for (widget, binding) in bindings {
            self.bindings.insert(widget, (group, binding));
        }
    }

    /// What a widget does, `None` when unbound.
    #[must_use]
    pub fn lookup(&self, widget: &str) -> Option<&Binding> {
        self.bindings.get(widget).map(|(_, binding)| binding)
    }

    /// Number of live bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
