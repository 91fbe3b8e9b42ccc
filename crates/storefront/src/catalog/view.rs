//! Catalog display data and fragment templates.

use askama::Template;

use crate::filters;

use super::{CatalogEngine, FilterState, PriceBucket, Product, SortKey};

/// One product card, ready for display.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    /// Load-order number, used in widget names.
    pub id: u32,
    pub name: String,
    /// Price formatted to two decimals, e.g. `"$59.99"`.
    pub price: String,
    pub image: String,
    pub rating: u8,
    pub featured: bool,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            rating: product.rating,
            featured: product.featured,
            in_stock: product.in_stock,
        }
    }
}

/// The product grid, or its no-results state.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCardView>,
}

impl From<&CatalogEngine> for ProductGridTemplate {
    fn from(engine: &CatalogEngine) -> Self {
        Self {
            products: engine.visible().iter().map(ProductCardView::from).collect(),
        }
    }
}

/// "Showing N of M products" counter.
#[derive(Template)]
#[template(path = "partials/results_toolbar.html")]
pub struct ResultsToolbarTemplate {
    pub visible: usize,
    pub total: usize,
}

impl From<&CatalogEngine> for ResultsToolbarTemplate {
    fn from(engine: &CatalogEngine) -> Self {
        let (visible, total) = engine.counts();
        Self { visible, total }
    }
}

/// One row of the search suggestion dropdown.
#[derive(Debug, Clone)]
pub struct SuggestionView {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for SuggestionView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
        }
    }
}

/// The suggestion dropdown, or its no-matches state.
#[derive(Template)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub suggestions: Vec<SuggestionView>,
}

impl SuggestionsTemplate {
    /// Suggestions for `query` against the whole catalog.
    #[must_use]
    pub fn for_query(engine: &CatalogEngine, query: &str) -> Self {
        Self {
            suggestions: engine
                .suggestions(query)
                .into_iter()
                .map(SuggestionView::from)
                .collect(),
        }
    }
}

/// One `<option>` in a filter select.
#[derive(Debug, Clone)]
pub struct SelectOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The search box and the three filter selects, reflecting the committed
/// filter state. Re-rendered whenever that state changes so the controls
/// never drift from the engine.
#[derive(Template)]
#[template(path = "partials/filter_controls.html")]
pub struct FilterControlsView {
    pub search: String,
    pub categories: Vec<SelectOptionView>,
    pub prices: Vec<SelectOptionView>,
    pub sorts: Vec<SelectOptionView>,
}

const CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("all", "All categories"),
    ("fashion", "Fashion"),
    ("sporty", "Sporty"),
    ("sun", "Sun"),
    ("prescription", "Prescription"),
];

const PRICE_OPTIONS: &[(&str, &str)] = &[
    ("all", "Any price"),
    ("0-50", "Up to $50"),
    ("50-100", "$50 to $100"),
    ("100-200", "$100 to $200"),
    ("200+", "Over $200"),
];

const SORT_OPTIONS: &[(SortKey, &str)] = &[
    (SortKey::NameAsc, "Name (A-Z)"),
    (SortKey::NameDesc, "Name (Z-A)"),
    (SortKey::PriceAsc, "Price (low to high)"),
    (SortKey::PriceDesc, "Price (high to low)"),
    (SortKey::RatingDesc, "Best rated"),
    (SortKey::FeaturedFirst, "Featured"),
];

impl From<&FilterState> for FilterControlsView {
    fn from(filters: &FilterState) -> Self {
        let selected_category = filters.category.as_str();
        let selected_price = filters.price.as_str();

        Self {
            search: filters.search.clone(),
            categories: CATEGORY_OPTIONS
                .iter()
                .map(|&(value, label)| SelectOptionView {
                    value,
                    label,
                    selected: value == selected_category,
                })
                .collect(),
            prices: PRICE_OPTIONS
                .iter()
                .map(|&(value, label)| SelectOptionView {
                    value,
                    label,
                    selected: value == selected_price,
                })
                .collect(),
            sorts: SORT_OPTIONS
                .iter()
                .map(|&(key, label)| SelectOptionView {
                    value: key.as_str(),
                    label,
                    selected: key == filters.sort,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lumen_core::Currency;

    use crate::catalog::{CardSource, CategoryFilter, ProductCard};

    use super::*;

    fn engine() -> CatalogEngine {
        let cards = vec![
            ProductCard {
                name: Some("Aviator Sol".to_string()),
                price_text: Some("$59.99".to_string()),
                image: None,
            },
            ProductCard {
                name: Some("Runner Deportivo".to_string()),
                price_text: Some("$120.50".to_string()),
                image: None,
            },
        ];
        CatalogEngine::from_source(CardSource::new(cards, 3), Currency::USD).unwrap()
    }

    #[test]
    fn test_grid_template_renders_cards() {
        let html = ProductGridTemplate::from(&engine()).render().unwrap();

        assert!(html.contains("Aviator Sol"));
        assert!(html.contains("$59.99"));
        assert!(html.contains("card-add:1"));
        assert!(html.contains("card-add:2"));
        // Rating renders as stars
        assert!(html.contains('★'));
    }

    #[test]
    fn test_grid_template_renders_no_results_state() {
        let mut engine = engine();
        engine.set_search("nothing matches this");
        engine.apply_filters();

        let html = ProductGridTemplate::from(&engine).render().unwrap();
        assert!(html.contains("No products found"));
        assert!(html.contains("clear-filters"));
    }

    #[test]
    fn test_toolbar_template_counts() {
        let mut engine = engine();
        engine.set_category(CategoryFilter::parse("sun"));
        engine.apply_filters();

        let html = ResultsToolbarTemplate::from(&engine).render().unwrap();
        assert!(html.contains("Showing 1 of 2 products"));
    }

    #[test]
    fn test_suggestions_template_lists_matches() {
        let engine = engine();
        let html = SuggestionsTemplate::for_query(&engine, "avia")
            .render()
            .unwrap();

        assert!(html.contains("Aviator Sol"));
        assert!(html.contains("suggestion:1"));
        assert!(!html.contains("Runner"));
    }

    #[test]
    fn test_suggestions_template_empty_state() {
        let engine = engine();
        let html = SuggestionsTemplate::for_query(&engine, "zzz")
            .render()
            .unwrap();
        assert!(html.contains("No products found"));
    }

    #[test]
    fn test_filter_controls_reflect_state() {
        let mut engine = engine();
        engine.set_category(CategoryFilter::parse("sporty"));
        engine.set_search("runner".to_string());
        engine.apply_filters();

        let view = FilterControlsView::from(engine.filters());
        let html = view.render().unwrap();

        assert!(html.contains(r#"value="runner""#));
        assert!(html.contains(r#"<option value="sporty" selected>"#));
        assert!(html.contains(r#"<option value="all">"#));
    }
}
