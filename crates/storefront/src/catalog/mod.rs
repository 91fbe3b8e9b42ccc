//! Catalog filtering and sorting.
//!
//! The engine loads its product list once from a [`CatalogSource`], then
//! answers every filter change by re-running the whole pipeline over that
//! list: search, then category, then price bucket, then a stable sort.
//! The visible list is always derived, never mutated in place.

mod source;
mod view;

pub use source::{
    CardSource, CatalogSource, DemoSource, JsonCatalogSource, ProductCard, ProductSeed,
};
pub use view::{
    FilterControlsView, ProductCardView, ProductGridTemplate, ResultsToolbarTemplate,
    SelectOptionView, SuggestionView, SuggestionsTemplate,
};

use lumen_core::{Currency, Money, ProductId};
use thiserror::Error;

use crate::cart::ProductDescriptor;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog source error: {0}")]
    Source(String),
    #[error("Catalog file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Position in load order, numbered from 1.
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub category: Category,
    pub description: String,
    /// 1 to 5.
    pub rating: u8,
    pub in_stock: bool,
    pub featured: bool,
}

/// Product category, inferred from the name when not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fashion,
    Sporty,
    Sun,
    Prescription,
}

impl Category {
    /// Infer a category from keywords in the product name.
    ///
    /// First match wins, checked in a fixed order, case-insensitively.
    /// Both the Spanish and English spellings of each keyword count; a
    /// name matching nothing is fashion eyewear.
    #[must_use]
    pub fn infer(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if lowered.contains("deportivo") || lowered.contains("sport") {
            Self::Sporty
        } else if lowered.contains("sol") || lowered.contains("sun") {
            Self::Sun
        } else if lowered.contains("graduado") || lowered.contains("prescription") {
            Self::Prescription
        } else {
            Self::Fashion
        }
    }

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fashion => "fashion",
            Self::Sporty => "sporty",
            Self::Sun => "sun",
            Self::Prescription => "prescription",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fashion => "Fashion",
            Self::Sporty => "Sporty",
            Self::Sun => "Sun",
            Self::Prescription => "Prescription",
        }
    }
}

/// Category facet of the filter state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a control value. Accepts the English wire names and their
    /// Spanish aliases; anything unknown falls back to `All`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fashion" | "moda" => Self::Only(Category::Fashion),
            "sporty" | "deportivo" => Self::Only(Category::Sporty),
            "sun" | "sol" => Self::Only(Category::Sun),
            "prescription" | "graduado" => Self::Only(Category::Prescription),
            _ => Self::All,
        }
    }

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    /// Whether a product of `category` passes this facet.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Price bucket facet. Boundaries land in the lower bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceBucket {
    #[default]
    All,
    UpTo50,
    From50To100,
    From100To200,
    Over200,
}

impl PriceBucket {
    /// Parse a control value; anything unknown falls back to `All`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "0-50" => Self::UpTo50,
            "50-100" => Self::From50To100,
            "100-200" => Self::From100To200,
            "200+" => Self::Over200,
            _ => Self::All,
        }
    }

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::UpTo50 => "0-50",
            Self::From50To100 => "50-100",
            Self::From100To200 => "100-200",
            Self::Over200 => "200+",
        }
    }

    /// Whether a price falls inside this bucket.
    #[must_use]
    pub fn contains(self, price: &Money) -> bool {
        let amount = price.amount();
        match self {
            Self::All => true,
            Self::UpTo50 => amount <= 50.into(),
            Self::From50To100 => amount > 50.into() && amount <= 100.into(),
            Self::From100To200 => amount > 100.into() && amount <= 200.into(),
            Self::Over200 => amount > 200.into(),
        }
    }
}

/// Sort order for the visible list. Every sort is stable: products that
/// compare equal keep their filtered order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    FeaturedFirst,
}

impl SortKey {
    /// Parse a control value; anything unknown falls back to name order.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "name-desc" | "name-descending" => Self::NameDesc,
            "price" | "price-asc" | "price-ascending" => Self::PriceAsc,
            "price-desc" | "price-descending" => Self::PriceDesc,
            "rating" | "rating-desc" => Self::RatingDesc,
            "featured" | "featured-first" => Self::FeaturedFirst,
            _ => Self::NameAsc,
        }
    }

    /// Stable wire name, matching the sort control's option values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating",
            Self::FeaturedFirst => "featured",
        }
    }
}

/// The four active filter facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub price: PriceBucket,
    /// Committed search query. Empty matches everything.
    pub search: String,
    pub sort: SortKey,
}

/// The catalog filter engine.
#[derive(Debug)]
pub struct CatalogEngine {
    products: Vec<Product>,
    filters: FilterState,
    visible: Vec<Product>,
}

impl CatalogEngine {
    /// Load the product list from a source and show everything.
    ///
    /// The source runs exactly once; products are numbered from 1 in load
    /// order, missing descriptions are synthesized, and ratings are
    /// clamped to 1 to 5. The initial visible list is the load order,
    /// unsorted, until the first filter change.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the source cannot produce seeds.
    pub fn from_source<C: CatalogSource>(
        source: C,
        currency: Currency,
    ) -> Result<Self, CatalogError> {
        let seeds = source.load()?;
        let products: Vec<Product> = seeds
            .into_iter()
            .zip(1_u32..)
            .map(|(seed, number)| seed.into_product(ProductId::new(number), currency))
            .collect();

        tracing::debug!(products = products.len(), "catalog loaded");
        let visible = products.clone();
        Ok(Self {
            products,
            filters: FilterState::default(),
            visible,
        })
    }

    /// The committed filter state.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The products that pass the current filters, in sorted order.
    #[must_use]
    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    /// Visible and total product counts, for the results toolbar.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.visible.len(), self.products.len())
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Build the cart handoff for a product, the way a rendered card
    /// carries it: name, displayed price text, and image.
    #[must_use]
    pub fn descriptor_for(&self, id: ProductId) -> Option<ProductDescriptor> {
        self.product(id).map(|product| ProductDescriptor {
            name: Some(product.name.clone()),
            price_text: Some(product.price.display()),
            image: Some(product.image.clone()),
        })
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filters.search = query.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filters.category = category;
    }

    pub fn set_price(&mut self, price: PriceBucket) {
        self.filters.price = price;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.filters.sort = sort;
    }

    /// Re-derive the visible list from the full product list.
    ///
    /// Pipeline order: search, category, price, then a stable sort. The
    /// search facet matches the name or the description, case-insensitively.
    pub fn apply_filters(&mut self) {
        let query = self.filters.search.trim().to_lowercase();

        let mut visible: Vec<Product> = self
            .products
            .iter()
            .filter(|product| {
                query.is_empty()
                    || product.name.to_lowercase().contains(&query)
                    || product.description.to_lowercase().contains(&query)
            })
            .filter(|product| self.filters.category.matches(product.category))
            .filter(|product| self.filters.price.contains(&product.price))
            .cloned()
            .collect();

        sort_products(&mut visible, self.filters.sort);
        self.visible = visible;
    }

    /// Reset every facet to its default and re-derive.
    ///
    /// Running this on an already-default state is a no-op beyond the
    /// re-derive; it never errors.
    pub fn clear_all(&mut self) {
        self.filters = FilterState::default();
        self.apply_filters();
    }

    /// Up to five products whose names contain `query`, case-insensitively.
    ///
    /// Suggestions search the whole catalog, ignoring the committed
    /// filters. An empty query suggests nothing.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&query))
            .take(5)
            .collect()
    }
}

fn sort_products(products: &mut [Product], sort: SortKey) {
    match sort {
        SortKey::NameAsc => {
            products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::NameDesc => {
            products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.amount().cmp(&b.price.amount())),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.amount().cmp(&a.price.amount())),
        SortKey::RatingDesc => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortKey::FeaturedFirst => products.sort_by(|a, b| b.featured.cmp(&a.featured)),
    }
}
