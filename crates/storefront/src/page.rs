//! Page assembly and event dispatch.
//!
//! [`Storefront`] wires the engines to one concrete page load: it owns
//! the cart, the catalog, the toast slot, the search debouncer, and the
//! widget registry, and renders fragments into whatever regions the
//! surface provides. The host feeds it clicks, value changes, and clock
//! ticks; nothing in here spawns threads or reads the clock on its own,
//! which is what keeps the whole page deterministic under test.

use std::time::Instant;

use askama::Template;

use crate::cart::{
    CartChange, CartCountTemplate, CartEngine, CartItemsTemplate, CartTotalsTemplate,
    CartTotalsView, CartView, CheckoutOutcome,
};
use crate::catalog::{
    CatalogEngine, CatalogError, CatalogSource, CategoryFilter, FilterControlsView, PriceBucket,
    ProductGridTemplate, ResultsToolbarTemplate, SortKey, SuggestionsTemplate,
};
use crate::config::StorefrontConfig;
use crate::controls::{Action, Binding, BindingGroup, Controls, EditTarget, widget};
use crate::notify::{Toast, ToastCenter, ToastLevel};
use crate::product_page::ProductPage;
use crate::render::{Region, RenderError, Surface};
use crate::store::SlotStore;
use crate::timer::Debouncer;

/// Where checkout sends the shopper.
pub trait CheckoutGateway {
    /// Hand control to the checkout target.
    fn navigate(&mut self, target: &str);
}

/// Gateway that only logs the handoff; the demo binary's default.
#[derive(Debug, Default)]
pub struct LoggingGateway;

impl CheckoutGateway for LoggingGateway {
    fn navigate(&mut self, target: &str) {
        tracing::info!(url = %target, "checkout handoff");
    }
}

/// Gateway that records every handoff, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub visits: Vec<String>,
}

impl CheckoutGateway for RecordingGateway {
    fn navigate(&mut self, target: &str) {
        self.visits.push(target.to_string());
    }
}

/// One assembled page: engines, widgets, and the surface they render to.
pub struct Storefront<S: SlotStore, G: CheckoutGateway> {
    cart: CartEngine<S>,
    catalog: CatalogEngine,
    detail: Option<ProductPage>,
    controls: Controls,
    toasts: ToastCenter,
    search_debounce: Debouncer,
    surface: Box<dyn Surface>,
    gateway: G,
    checkout_url: String,
    cart_open: bool,
}

impl<S: SlotStore, G: CheckoutGateway> Storefront<S, G> {
    /// Assemble a page: restore the cart, load the catalog, bind the
    /// fixed widgets, and render every attached region once.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the catalog source cannot load. A
    /// broken cart snapshot is not an error; the cart starts empty.
    pub fn assemble<C: CatalogSource>(
        config: &StorefrontConfig,
        store: S,
        source: C,
        surface: Box<dyn Surface>,
        gateway: G,
    ) -> Result<Self, CatalogError> {
        let cart = CartEngine::restore(store, config.currency, config.pricing.clone());
        let catalog = CatalogEngine::from_source(source, config.currency)?;

        let mut page = Self {
            cart,
            catalog,
            detail: None,
            controls: Controls::new(),
            toasts: ToastCenter::new(config.toast_ttl),
            search_debounce: Debouncer::new(config.search_debounce),
            surface,
            gateway,
            checkout_url: config.checkout_url.clone(),
            cart_open: false,
        };

        page.bind_fixed_widgets();
        page.refresh_catalog();
        page.render_filter_controls();
        page.refresh_cart();
        Ok(page)
    }

    /// Attach a product detail block and render its stepper.
    #[must_use]
    pub fn with_product_detail(mut self, detail: ProductPage) -> Self {
        self.bind_detail_widgets();
        self.detail = Some(detail);
        self.render_detail();
        self
    }

    // ======
    // Event entry points
    // ======

    /// Route a widget click.
    pub fn click(&mut self, widget: &str, now: Instant) {
        match self.controls.lookup(widget) {
            Some(Binding::Activate(action)) => {
                let action = action.clone();
                self.apply(action, now);
            }
            Some(Binding::Edit(_)) => {
                tracing::debug!(widget, "widget expects a value, click ignored");
            }
            None => {
                tracing::debug!(widget, "click on unbound widget ignored");
            }
        }
    }

    /// Route a value change from an input or select widget.
    pub fn change(&mut self, widget: &str, value: &str, now: Instant) {
        let Some(Binding::Edit(target)) = self.controls.lookup(widget) else {
            tracing::debug!(widget, "value change on non-edit widget ignored");
            return;
        };

        match target.clone() {
            EditTarget::SearchBox => self.search_debounce.submit(value, now),
            EditTarget::CategorySelect => {
                self.catalog.set_category(CategoryFilter::parse(value));
                self.catalog.apply_filters();
                self.refresh_catalog();
                self.render_filter_controls();
            }
            EditTarget::PriceSelect => {
                self.catalog.set_price(PriceBucket::parse(value));
                self.catalog.apply_filters();
                self.refresh_catalog();
                self.render_filter_controls();
            }
            EditTarget::SortSelect => {
                self.catalog.set_sort(SortKey::parse(value));
                self.catalog.apply_filters();
                self.refresh_catalog();
                self.render_filter_controls();
            }
            EditTarget::LineQuantity(id) => {
                // Unparseable and zero both reset to 1; negatives remove
                let quantity = value
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|quantity| *quantity != 0)
                    .unwrap_or(1);
                let change = self.cart.set_quantity(&id, quantity);
                self.notify_cart_change(&change, now);
                self.refresh_cart();
            }
            EditTarget::DetailQuantity => {
                if let Some(detail) = &mut self.detail {
                    detail.set_from_input(value);
                    self.render_detail();
                }
            }
        }
    }

    /// Advance time: fire a due search and expire a due toast.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.search_debounce.fire_due(now) {
            self.commit_search(&query);
        }
        if self.toasts.expire_due(now) {
            self.surface.clear(Region::ToastTray);
        }
    }

    /// The next instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (
            self.search_debounce.next_deadline(),
            self.toasts.next_deadline(),
        ) {
            (Some(search), Some(toast)) => Some(search.min(toast)),
            (search, toast) => search.or(toast),
        }
    }

    /// Apply an action directly, bypassing widget lookup.
    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::OpenCartPanel => {
                self.cart_open = true;
                self.render_cart_panel();
            }
            Action::CloseCartPanel => self.cart_open = false,
            Action::AddFromCatalog(id) => {
                let Some(descriptor) = self.catalog.descriptor_for(id) else {
                    tracing::debug!(product = id.as_u32(), "add for unknown product ignored");
                    return;
                };
                let change = self.cart.add_item(descriptor);
                self.notify_cart_change(&change, now);
                self.refresh_cart();
            }
            Action::ChooseSuggestion(id) => {
                let Some(name) = self.catalog.product(id).map(|product| product.name.clone())
                else {
                    return;
                };
                self.search_debounce.cancel();
                self.catalog.set_search(name);
                self.catalog.apply_filters();
                self.refresh_catalog();
                self.render_filter_controls();
                self.clear_suggestions();
            }
            Action::IncrementLine(id) => {
                let change = self.cart.change_quantity(&id, 1);
                self.notify_cart_change(&change, now);
                self.refresh_cart();
            }
            Action::DecrementLine(id) => {
                let change = self.cart.change_quantity(&id, -1);
                self.notify_cart_change(&change, now);
                self.refresh_cart();
            }
            Action::RemoveLine(id) => {
                let change = self.cart.remove_item(&id);
                self.notify_cart_change(&change, now);
                self.refresh_cart();
            }
            Action::ClearCart => {
                self.cart.clear();
                self.toast(ToastLevel::Info, "Cart cleared", now);
                self.refresh_cart();
            }
            Action::Checkout => match self.cart.checkout() {
                CheckoutOutcome::EmptyCart => {
                    self.toast(ToastLevel::Warning, "Your cart is empty", now);
                }
                CheckoutOutcome::SnapshotFailed => {
                    self.toast(ToastLevel::Error, "Checkout is unavailable right now", now);
                }
                CheckoutOutcome::HandedOff => {
                    let url = self.checkout_url.clone();
                    self.gateway.navigate(&url);
                }
            },
            Action::ClearSearch => {
                self.search_debounce.cancel();
                self.catalog.set_search("");
                self.catalog.apply_filters();
                self.refresh_catalog();
                self.render_filter_controls();
                self.clear_suggestions();
            }
            Action::ClearFilters => {
                self.search_debounce.cancel();
                self.catalog.clear_all();
                self.refresh_catalog();
                self.render_filter_controls();
                self.clear_suggestions();
            }
            Action::IncrementDetailQuantity => self.step_detail(1),
            Action::DecrementDetailQuantity => self.step_detail(-1),
            Action::AddDetailToCart => self.add_detail_to_cart(now),
            Action::BuyNow => {
                self.add_detail_to_cart(now);
                self.apply(Action::Checkout, now);
            }
        }
    }

    // ======
    // Accessors
    // ======

    #[must_use]
    pub fn cart(&self) -> &CartEngine<S> {
        &self.cart
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogEngine {
        &self.catalog
    }

    #[must_use]
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub fn current_toast(&self) -> Option<&Toast> {
        self.toasts.current()
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    #[must_use]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Tear the page down and hand back the slot store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.cart.into_store()
    }

    // ======
    // Internals
    // ======

    fn bind_fixed_widgets(&mut self) {
        let fixed: [(&str, Binding); 10] = [
            (widget::CART_ICON, Binding::Activate(Action::OpenCartPanel)),
            (widget::CART_CLOSE, Binding::Activate(Action::CloseCartPanel)),
            (
                widget::CART_CONTINUE,
                Binding::Activate(Action::CloseCartPanel),
            ),
            (widget::CART_CHECKOUT, Binding::Activate(Action::Checkout)),
            (widget::SEARCH_BOX, Binding::Edit(EditTarget::SearchBox)),
            (widget::CLEAR_SEARCH, Binding::Activate(Action::ClearSearch)),
            (
                widget::CATEGORY_SELECT,
                Binding::Edit(EditTarget::CategorySelect),
            ),
            (widget::PRICE_SELECT, Binding::Edit(EditTarget::PriceSelect)),
            (widget::SORT_SELECT, Binding::Edit(EditTarget::SortSelect)),
            (
                widget::CLEAR_FILTERS,
                Binding::Activate(Action::ClearFilters),
            ),
        ];
        for (name, binding) in fixed {
            self.controls.bind(name, BindingGroup::Fixed, binding);
        }
    }

    fn bind_detail_widgets(&mut self) {
        let fixed: [(&str, Binding); 5] = [
            (
                widget::DETAIL_QTY_MINUS,
                Binding::Activate(Action::DecrementDetailQuantity),
            ),
            (
                widget::DETAIL_QTY_PLUS,
                Binding::Activate(Action::IncrementDetailQuantity),
            ),
            (
                widget::DETAIL_QTY_INPUT,
                Binding::Edit(EditTarget::DetailQuantity),
            ),
            (widget::DETAIL_ADD, Binding::Activate(Action::AddDetailToCart)),
            (widget::DETAIL_BUY_NOW, Binding::Activate(Action::BuyNow)),
        ];
        for (name, binding) in fixed {
            self.controls.bind(name, BindingGroup::Fixed, binding);
        }
    }

    fn commit_search(&mut self, query: &str) {
        self.catalog.set_search(query);
        self.catalog.apply_filters();
        self.refresh_catalog();
        self.render_filter_controls();

        // The dropdown only opens for queries longer than two characters
        if query.chars().count() > 2 {
            self.render_suggestions(query);
        } else {
            self.clear_suggestions();
        }
    }

    fn step_detail(&mut self, delta: i64) {
        if let Some(detail) = &mut self.detail {
            detail.step(delta);
            self.render_detail();
        }
    }

    fn add_detail_to_cart(&mut self, now: Instant) {
        let Some((quantity, id, descriptor)) = self
            .detail
            .as_ref()
            .map(|detail| (detail.quantity(), detail.item_id(), detail.descriptor()))
        else {
            return;
        };

        let change = self.cart.add_item(descriptor);
        if quantity > 1 {
            self.cart.change_quantity(&id, i64::from(quantity) - 1);
        }
        self.notify_cart_change(&change, now);
        self.refresh_cart();
    }

    fn notify_cart_change(&mut self, change: &CartChange, now: Instant) {
        match change {
            CartChange::Added { name } => {
                self.toast(ToastLevel::Success, format!("{name} added to cart"), now);
            }
            CartChange::Increased { name } => {
                self.toast(
                    ToastLevel::Success,
                    format!("Increased quantity of {name}"),
                    now,
                );
            }
            CartChange::Removed { name } => {
                self.toast(ToastLevel::Info, format!("{name} removed from cart"), now);
            }
            CartChange::Updated { .. } | CartChange::NotFound => {}
        }
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        self.toasts.push(level, message, now);
        self.render_toast();
    }

    // ======
    // Rendering
    // ======

    fn refresh_cart(&mut self) {
        self.render_cart_panel();
        self.render_cart_count();
    }

    /// Items and totals. Skipped unless the layout carries both
    /// containers; an empty cart shows its message in the items region
    /// and clears the totals region entirely.
    fn render_cart_panel(&mut self) {
        if !self.surface.is_attached(Region::CartItems)
            || !self.surface.is_attached(Region::CartTotals)
        {
            return;
        }

        let items = rendered(&CartItemsTemplate {
            cart: CartView::from(&self.cart),
        });
        self.mount(Region::CartItems, items);

        if self.cart.is_empty() {
            self.surface.clear(Region::CartTotals);
        } else {
            let totals = rendered(&CartTotalsTemplate {
                totals: CartTotalsView::from(&self.cart.totals()),
            });
            self.mount(Region::CartTotals, totals);
        }

        self.rebind_cart_lines();
    }

    fn render_cart_count(&mut self) {
        let count = rendered(&CartCountTemplate {
            count: self.cart.item_count(),
        });
        self.mount(Region::CartCount, count);
    }

    fn refresh_catalog(&mut self) {
        let grid = rendered(&ProductGridTemplate::from(&self.catalog));
        self.mount(Region::ProductGrid, grid);

        let toolbar = rendered(&ResultsToolbarTemplate::from(&self.catalog));
        self.mount(Region::ResultsToolbar, toolbar);

        self.rebind_catalog_cards();
    }

    fn render_filter_controls(&mut self) {
        let controls = rendered(&FilterControlsView::from(self.catalog.filters()));
        self.mount(Region::FilterControls, controls);
    }

    fn render_suggestions(&mut self, query: &str) {
        let bindings: Vec<(String, Binding)> = self
            .catalog
            .suggestions(query)
            .into_iter()
            .map(|product| {
                (
                    widget::suggestion(product.id),
                    Binding::Activate(Action::ChooseSuggestion(product.id)),
                )
            })
            .collect();
        self.controls
            .rebind_group(BindingGroup::Suggestions, bindings);

        let dropdown = rendered(&SuggestionsTemplate::for_query(&self.catalog, query));
        self.mount(Region::Suggestions, dropdown);
    }

    fn clear_suggestions(&mut self) {
        self.controls
            .rebind_group(BindingGroup::Suggestions, Vec::new());
        self.surface.clear(Region::Suggestions);
    }

    fn render_detail(&mut self) {
        let Some(detail) = &self.detail else {
            return;
        };
        let fragment = rendered(&detail.template());
        self.mount(Region::ProductDetail, fragment);
    }

    fn render_toast(&mut self) {
        let Some(toast) = self.toasts.current() else {
            return;
        };
        let fragment = rendered(&ToastTemplate {
            level: toast.level.as_str(),
            message: toast.message.clone(),
        });
        self.mount(Region::ToastTray, fragment);
    }

    fn rebind_cart_lines(&mut self) {
        let bindings: Vec<(String, Binding)> = self
            .cart
            .items()
            .iter()
            .flat_map(|item| {
                let id = item.id.clone();
                [
                    (
                        widget::cart_increase(&id),
                        Binding::Activate(Action::IncrementLine(id.clone())),
                    ),
                    (
                        widget::cart_decrease(&id),
                        Binding::Activate(Action::DecrementLine(id.clone())),
                    ),
                    (
                        widget::cart_quantity(&id),
                        Binding::Edit(EditTarget::LineQuantity(id.clone())),
                    ),
                    (
                        widget::cart_remove(&id),
                        Binding::Activate(Action::RemoveLine(id)),
                    ),
                ]
            })
            .collect();
        self.controls.rebind_group(BindingGroup::CartLines, bindings);
    }

    fn rebind_catalog_cards(&mut self) {
        let bindings: Vec<(String, Binding)> = self
            .catalog
            .visible()
            .iter()
            .filter(|product| product.in_stock)
            .map(|product| {
                (
                    widget::card_add(product.id),
                    Binding::Activate(Action::AddFromCatalog(product.id)),
                )
            })
            .collect();
        self.controls
            .rebind_group(BindingGroup::CatalogCards, bindings);
    }

    fn mount(&mut self, region: Region, fragment: Result<String, RenderError>) {
        match fragment {
            Ok(html) => self.surface.mount(region, html),
            Err(e) => tracing::error!(region = %region, error = %e, "fragment render failed"),
        }
    }
}

/// The single visible toast.
#[derive(Template)]
#[template(path = "partials/toast.html")]
struct ToastTemplate {
    level: &'static str,
    message: String,
}

fn rendered<T: Template>(template: &T) -> Result<String, RenderError> {
    template.render().map_err(RenderError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use crate::catalog::{CardSource, ProductCard};
    use crate::render::InMemorySurface;
    use crate::store::MemoryStore;

    use super::*;

    fn card(name: &str, price: &str) -> ProductCard {
        ProductCard {
            name: Some(name.to_string()),
            price_text: Some(price.to_string()),
            image: None,
        }
    }

    fn catalog_cards() -> Vec<ProductCard> {
        vec![
            card("Aviator Sol", "$59.99"),
            card("Runner Deportivo", "$120.50"),
            card("Urbana Clasica", "$45.00"),
        ]
    }

    fn test_page() -> Storefront<MemoryStore, RecordingGateway> {
        page_with_store(MemoryStore::new())
    }

    fn page_with_store(store: MemoryStore) -> Storefront<MemoryStore, RecordingGateway> {
        Storefront::assemble(
            &StorefrontConfig::default(),
            store,
            CardSource::new(catalog_cards(), 3),
            Box::new(InMemorySurface::full_page()),
            RecordingGateway::default(),
        )
        .unwrap()
    }

    fn fragment(page: &Storefront<MemoryStore, RecordingGateway>, region: Region) -> String {
        page.surface().fragment(region).unwrap_or_default().to_string()
    }

    #[test]
    fn test_assemble_renders_initial_fragments() {
        let page = test_page();

        let grid = fragment(&page, Region::ProductGrid);
        assert!(grid.contains("Aviator Sol"));
        assert!(grid.contains("Runner Deportivo"));
        assert!(grid.contains("Urbana Clasica"));

        assert!(fragment(&page, Region::ResultsToolbar).contains("Showing 3 of 3 products"));
        assert!(fragment(&page, Region::CartItems).contains("Your cart is empty"));
        assert!(fragment(&page, Region::CartCount).contains("hidden"));
        assert!(fragment(&page, Region::FilterControls).contains("product-search"));
    }

    #[test]
    fn test_card_click_adds_to_cart() {
        let mut page = test_page();
        let now = Instant::now();

        page.click("card-add:1", now);

        assert_eq!(page.cart().items().len(), 1);
        assert_eq!(page.cart().items()[0].name, "Aviator Sol");

        let toast = page.current_toast().unwrap();
        assert_eq!(toast.message, "Aviator Sol added to cart");
        assert_eq!(toast.level, ToastLevel::Success);

        assert!(fragment(&page, Region::CartItems).contains("Aviator Sol"));
        assert!(fragment(&page, Region::CartCount).contains('1'));
    }

    #[test]
    fn test_second_add_merges_and_changes_toast() {
        let mut page = test_page();
        let now = Instant::now();

        page.click("card-add:1", now);
        page.click("card-add:1", now);

        assert_eq!(page.cart().items().len(), 1);
        assert_eq!(page.cart().items()[0].quantity.get(), 2);
        assert_eq!(
            page.current_toast().unwrap().message,
            "Increased quantity of Aviator Sol"
        );
    }

    #[test]
    fn test_unbound_widget_click_is_ignored() {
        let mut page = test_page();
        page.click("no-such-widget", Instant::now());

        assert!(page.cart().is_empty());
        assert!(page.current_toast().is_none());
    }

    #[test]
    fn test_search_commits_only_after_quiet_window() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.change(widget::SEARCH_BOX, "runner", t0);

        page.tick(t0 + Duration::from_millis(200));
        assert!(fragment(&page, Region::ProductGrid).contains("Aviator Sol"));

        page.tick(t0 + Duration::from_millis(300));
        let grid = fragment(&page, Region::ProductGrid);
        assert!(grid.contains("Runner Deportivo"));
        assert!(!grid.contains("Aviator Sol"));
        assert!(fragment(&page, Region::ResultsToolbar).contains("Showing 1 of 3 products"));
    }

    #[test]
    fn test_rapid_typing_commits_last_value_once() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.change(widget::SEARCH_BOX, "avi", t0);
        page.change(widget::SEARCH_BOX, "urbana", t0 + Duration::from_millis(100));

        // First submission's window elapsing fires nothing
        page.tick(t0 + Duration::from_millis(300));
        assert_eq!(page.catalog().filters().search, "");

        page.tick(t0 + Duration::from_millis(400));
        assert_eq!(page.catalog().filters().search, "urbana");
        assert!(fragment(&page, Region::ProductGrid).contains("Urbana Clasica"));
    }

    #[test]
    fn test_short_queries_keep_suggestions_closed() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.change(widget::SEARCH_BOX, "av", t0);
        page.tick(t0 + Duration::from_millis(300));
        assert_eq!(fragment(&page, Region::Suggestions), "");

        page.change(widget::SEARCH_BOX, "avia", t0 + Duration::from_millis(400));
        page.tick(t0 + Duration::from_millis(700));
        assert!(fragment(&page, Region::Suggestions).contains("Aviator Sol"));
    }

    #[test]
    fn test_choosing_suggestion_commits_exact_name() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.change(widget::SEARCH_BOX, "avia", t0);
        page.tick(t0 + Duration::from_millis(300));

        page.click("suggestion:1", t0 + Duration::from_millis(400));

        assert_eq!(page.catalog().filters().search, "Aviator Sol");
        let grid = fragment(&page, Region::ProductGrid);
        assert!(grid.contains("Aviator Sol"));
        assert!(!grid.contains("Runner"));
        assert_eq!(fragment(&page, Region::Suggestions), "");
        assert!(fragment(&page, Region::FilterControls).contains("Aviator Sol"));
    }

    #[test]
    fn test_category_select_filters_immediately() {
        let mut page = test_page();
        let now = Instant::now();

        page.change(widget::CATEGORY_SELECT, "sporty", now);

        let grid = fragment(&page, Region::ProductGrid);
        assert!(grid.contains("Runner Deportivo"));
        assert!(!grid.contains("Aviator Sol"));
        assert!(
            fragment(&page, Region::FilterControls)
                .contains(r#"<option value="sporty" selected>"#)
        );
    }

    #[test]
    fn test_no_results_state_offers_clear_filters() {
        let mut page = test_page();
        let now = Instant::now();

        page.change(widget::CATEGORY_SELECT, "prescription", now);
        assert!(fragment(&page, Region::ProductGrid).contains("No products found"));
        assert!(fragment(&page, Region::ResultsToolbar).contains("Showing 0 of 3 products"));

        page.click(widget::CLEAR_FILTERS, now);
        assert!(fragment(&page, Region::ProductGrid).contains("Aviator Sol"));
        assert_eq!(page.catalog().filters(), &crate::catalog::FilterState::default());
    }

    #[test]
    fn test_cart_line_widgets_drive_quantities() {
        let mut page = test_page();
        let now = Instant::now();
        page.click("card-add:1", now);

        page.click("cart-increase:aviator-sol", now);
        assert_eq!(page.cart().items()[0].quantity.get(), 2);

        page.change("cart-quantity:aviator-sol", "5", now);
        assert_eq!(page.cart().items()[0].quantity.get(), 5);

        page.change("cart-quantity:aviator-sol", "abc", now);
        assert_eq!(page.cart().items()[0].quantity.get(), 1);

        page.click("cart-decrease:aviator-sol", now);
        assert!(page.cart().is_empty());
        assert_eq!(
            page.current_toast().unwrap().message,
            "Aviator Sol removed from cart"
        );
    }

    #[test]
    fn test_stale_line_widgets_stop_firing_after_removal() {
        let mut page = test_page();
        let now = Instant::now();
        page.click("card-add:1", now);
        page.click("cart-remove:aviator-sol", now);
        assert!(page.cart().is_empty());

        // The line's widgets were rebound away with the fragment
        page.click("cart-increase:aviator-sol", now);
        assert!(page.cart().is_empty());
    }

    #[test]
    fn test_empty_cart_clears_totals_region() {
        let mut page = test_page();
        let now = Instant::now();

        page.click("card-add:1", now);
        assert!(fragment(&page, Region::CartTotals).contains("Subtotal"));

        page.click("cart-remove:aviator-sol", now);
        assert_eq!(fragment(&page, Region::CartTotals), "");
        assert!(fragment(&page, Region::CartItems).contains("Your cart is empty"));
    }

    #[test]
    fn test_checkout_with_empty_cart_warns_and_stays() {
        let mut page = test_page();
        page.click(widget::CART_CHECKOUT, Instant::now());

        let toast = page.current_toast().unwrap();
        assert_eq!(toast.message, "Your cart is empty");
        assert_eq!(toast.level, ToastLevel::Warning);
        assert!(page.gateway().visits.is_empty());
    }

    #[test]
    fn test_checkout_snapshots_and_navigates() {
        let mut page = test_page();
        let now = Instant::now();

        page.click("card-add:1", now);
        page.click(widget::CART_CHECKOUT, now);

        assert_eq!(page.gateway().visits, vec!["checkout.html".to_string()]);
        // The live cart survives the handoff
        assert_eq!(page.cart().items().len(), 1);

        let snapshot = page.cart().pending_checkout().unwrap().unwrap();
        assert!(snapshot.contains("aviator-sol"));
    }

    #[test]
    fn test_toast_expires_on_tick() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.click("card-add:1", t0);
        assert!(page.current_toast().is_some());
        assert!(!fragment(&page, Region::ToastTray).is_empty());

        page.tick(t0 + Duration::from_secs(3));
        assert!(page.current_toast().is_none());
        assert_eq!(fragment(&page, Region::ToastTray), "");
    }

    #[test]
    fn test_replacing_toast_restarts_its_clock() {
        let mut page = test_page();
        let t0 = Instant::now();

        page.click("card-add:1", t0);
        page.click("card-add:2", t0 + Duration::from_secs(2));

        page.tick(t0 + Duration::from_secs(3));
        assert_eq!(
            page.current_toast().unwrap().message,
            "Runner Deportivo added to cart"
        );

        page.tick(t0 + Duration::from_secs(5));
        assert!(page.current_toast().is_none());
    }

    #[test]
    fn test_cart_panel_open_close() {
        let mut page = test_page();
        let now = Instant::now();

        assert!(!page.is_cart_open());
        page.click(widget::CART_ICON, now);
        assert!(page.is_cart_open());
        page.click(widget::CART_CLOSE, now);
        assert!(!page.is_cart_open());
    }

    #[test]
    fn test_detail_page_steps_and_buys() {
        let mut page = test_page().with_product_detail(ProductPage::new(
            "Aviator Sol",
            "$59.99",
            "images/aviator.jpg",
        ));
        let now = Instant::now();

        page.click(widget::DETAIL_QTY_PLUS, now);
        page.click(widget::DETAIL_QTY_PLUS, now);
        assert!(fragment(&page, Region::ProductDetail).contains("Add to cart (3)"));

        page.click(widget::DETAIL_BUY_NOW, now);

        assert_eq!(page.cart().items()[0].quantity.get(), 3);
        assert_eq!(page.gateway().visits.len(), 1);
        let snapshot = page.cart().pending_checkout().unwrap().unwrap();
        assert!(snapshot.contains(r#""quantity":3"#));
    }

    #[test]
    fn test_detail_add_merges_with_existing_line() {
        let mut page = test_page().with_product_detail(ProductPage::new(
            "Aviator Sol",
            "$59.99",
            "images/aviator.jpg",
        ));
        let now = Instant::now();

        page.click("card-add:1", now);
        page.change(widget::DETAIL_QTY_INPUT, "2", now);
        page.click(widget::DETAIL_ADD, now);

        assert_eq!(page.cart().items().len(), 1);
        assert_eq!(page.cart().items()[0].quantity.get(), 3);
        assert_eq!(
            page.current_toast().unwrap().message,
            "Increased quantity of Aviator Sol"
        );
    }

    #[test]
    fn test_cart_restores_across_page_loads() {
        let mut store = MemoryStore::new();
        {
            let mut page = page_with_store(std::mem::take(&mut store));
            page.click("card-add:1", Instant::now());
            page.click("card-add:1", Instant::now());
            store = page.into_store();
        }

        let page = page_with_store(store);
        assert_eq!(page.cart().items()[0].quantity.get(), 2);
        assert!(fragment(&page, Region::CartItems).contains("Aviator Sol"));
        assert!(fragment(&page, Region::CartCount).contains('2'));
    }

    #[test]
    fn test_partial_layout_skips_missing_regions() {
        let surface = InMemorySurface::with_regions([Region::CartCount, Region::CartItems]);
        let mut page = Storefront::assemble(
            &StorefrontConfig::default(),
            MemoryStore::new(),
            CardSource::new(catalog_cards(), 3),
            Box::new(surface),
            RecordingGateway::default(),
        )
        .unwrap();
        let now = Instant::now();

        // Bindings come from engine state, not markup, so the add still works
        page.click("card-add:1", now);
        assert_eq!(page.cart().items().len(), 1);

        // The panel needs both items and totals containers; only the count rendered
        assert_eq!(page.surface().fragment(Region::CartItems), None);
        assert!(fragment(&page, Region::CartCount).contains('1'));
    }

    #[test]
    fn test_next_deadline_tracks_earliest_work() {
        let mut page = test_page();
        let t0 = Instant::now();
        assert_eq!(page.next_deadline(), None);

        page.click("card-add:1", t0);
        let toast_deadline = page.next_deadline().unwrap();
        assert_eq!(toast_deadline, t0 + Duration::from_secs(3));

        page.change(widget::SEARCH_BOX, "avia", t0);
        assert_eq!(
            page.next_deadline().unwrap(),
            t0 + Duration::from_millis(300)
        );
    }

    #[test]
    fn test_line_quantity_negative_input_removes() {
        let mut page = test_page();
        let now = Instant::now();
        page.click("card-add:1", now);

        page.change("cart-quantity:aviator-sol", "-2", now);
        assert!(page.cart().is_empty());
        assert_eq!(
            page.current_toast().unwrap().message,
            "Aviator Sol removed from cart"
        );
    }
}
