//! Catalog inspection commands.

use std::path::Path;

use tracing::info;

use lumen_core::Currency;
use lumen_storefront::catalog::{CatalogEngine, DemoSource, JsonCatalogSource};

/// Print every product the storefront would load, with its inferred
/// category and synthesized flags.
///
/// # Errors
///
/// Returns an error if the seed file cannot be read or parsed.
pub fn list(from: Option<&Path>, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let engine = match from {
        Some(path) => CatalogEngine::from_source(JsonCatalogSource::new(path), Currency::USD)?,
        None => CatalogEngine::from_source(DemoSource::new(seed), Currency::USD)?,
    };

    let (_, total) = engine.counts();
    info!(products = total, "catalog loaded");

    for product in engine.visible() {
        info!(
            id = product.id.as_u32(),
            category = product.category.as_str(),
            price = %product.price.display(),
            rating = product.rating,
            in_stock = product.in_stock,
            featured = product.featured,
            "{}",
            product.name
        );
    }
    Ok(())
}
