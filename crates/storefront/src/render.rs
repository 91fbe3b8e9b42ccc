//! Rendering against an abstract page surface.
//!
//! Engines never touch markup directly. They build HTML fragments from
//! templates and mount them into named regions of a [`Surface`]. A region
//! that is not attached on the current page (the product page has no
//! catalog grid, the catalog page has no detail block) swallows mounts
//! silently, so one assembly serves every page layout.

use std::collections::HashMap;

use thiserror::Error;

/// Named mount points a page layout may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Cart badge in the page header.
    CartCount,
    /// Line items inside the cart panel.
    CartItems,
    /// Subtotal, shipping, tax, and total rows.
    CartTotals,
    /// The catalog product grid.
    ProductGrid,
    /// Results counter above the grid.
    ResultsToolbar,
    /// Search, category, price, and sort controls.
    FilterControls,
    /// Live search suggestion dropdown.
    Suggestions,
    /// Single-slot notification tray.
    ToastTray,
    /// Quantity stepper and actions on the product page.
    ProductDetail,
}

impl Region {
    /// Every region, in render order.
    pub const ALL: [Self; 9] = [
        Self::CartCount,
        Self::CartItems,
        Self::CartTotals,
        Self::ProductGrid,
        Self::ResultsToolbar,
        Self::FilterControls,
        Self::Suggestions,
        Self::ToastTray,
        Self::ProductDetail,
    ];

    /// Stable kebab-case name, matching the markup's container ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CartCount => "cart-count",
            Self::CartItems => "cart-items",
            Self::CartTotals => "cart-totals",
            Self::ProductGrid => "product-grid",
            Self::ResultsToolbar => "results-toolbar",
            Self::FilterControls => "filter-controls",
            Self::Suggestions => "suggestions",
            Self::ToastTray => "toast-tray",
            Self::ProductDetail => "product-detail",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from fragment rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A page layout the engines render into.
///
/// Mounting into an unattached region is a no-op, not an error: the cart
/// travels to pages that have no catalog, and vice versa.
pub trait Surface {
    /// Whether the current layout provides this region.
    fn is_attached(&self, region: Region) -> bool;

    /// Replace the contents of a region.
    fn mount(&mut self, region: Region, html: String);

    /// Empty a region without detaching it.
    fn clear(&mut self, region: Region) {
        self.mount(region, String::new());
    }

    /// Current contents of a region, `None` until first mounted.
    fn fragment(&self, region: Region) -> Option<&str>;
}

/// Surface that holds mounted fragments in memory.
///
/// Serves the demo binary and every test; a real embedding would forward
/// mounts to actual page containers instead.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    attached: Vec<Region>,
    fragments: HashMap<Region, String>,
}

impl InMemorySurface {
    /// A surface providing exactly the given regions.
    #[must_use]
    pub fn with_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            attached: regions.into_iter().collect(),
            fragments: HashMap::new(),
        }
    }

    /// A surface providing every region.
    #[must_use]
    pub fn full_page() -> Self {
        Self::with_regions(Region::ALL)
    }
}

impl Surface for InMemorySurface {
    fn is_attached(&self, region: Region) -> bool {
        self.attached.contains(&region)
    }

    fn mount(&mut self, region: Region, html: String) {
        if !self.is_attached(region) {
            return;
        }
        self.fragments.insert(region, html);
    }

    fn fragment(&self, region: Region) -> Option<&str> {
        self.fragments.get(&region).map(String::as_str)
    }
}
