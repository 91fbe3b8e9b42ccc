//! Write a catalog seed file for the storefront to load.

use std::path::Path;

use tracing::info;

use lumen_storefront::catalog::{CatalogSource, DemoSource};

/// Generate the demo catalog and write it as pretty-printed JSON.
///
/// The storefront reads the file back through `JsonCatalogSource`, so a
/// hand-edited copy is a quick way to run against a custom catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be serialized or the file
/// cannot be written.
pub async fn write_file(out: &Path, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let seeds = DemoSource::new(seed).load()?;
    let json = serde_json::to_string_pretty(&seeds)?;

    tokio::fs::write(out, json).await?;

    info!(path = %out.display(), products = seeds.len(), "seed file written");
    Ok(())
}
