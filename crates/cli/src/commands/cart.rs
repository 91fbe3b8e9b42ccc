//! Persisted cart session commands.
//!
//! These operate on the same redb file the storefront uses, located via
//! `LUMEN_DATA_DIR`, so they see exactly what the next page load would
//! restore.

use tracing::info;

use lumen_storefront::cart::CartEngine;
use lumen_storefront::config::StorefrontConfig;
use lumen_storefront::store::RedbStore;

/// Print the persisted cart lines, derived totals, and whether a
/// checkout snapshot is waiting.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the session store
/// cannot be opened.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    if engine.is_empty() {
        info!("cart is empty");
    } else {
        for item in engine.items() {
            info!(
                id = %item.id,
                quantity = item.quantity.get(),
                unit_price = %item.price.display(),
                "{}",
                item.name
            );
        }
        let totals = engine.totals();
        info!(
            subtotal = %totals.subtotal.display(),
            shipping = %totals.shipping.display(),
            tax = %totals.tax.display(),
            total = %totals.total.display(),
            "totals"
        );
    }

    match engine.pending_checkout()? {
        Some(snapshot) => info!(bytes = snapshot.len(), "checkout snapshot pending"),
        None => info!("no checkout snapshot pending"),
    }
    Ok(())
}

/// Empty the persisted cart.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the session store
/// cannot be opened.
pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;
    let lines = engine.items().len();
    engine.clear();
    info!(lines, "cart cleared");
    Ok(())
}

fn open_engine() -> Result<CartEngine<RedbStore>, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    std::fs::create_dir_all(&config.data_dir)?;
    let store = RedbStore::open(config.store_path())?;
    Ok(CartEngine::restore(store, config.currency, config.pricing))
}
