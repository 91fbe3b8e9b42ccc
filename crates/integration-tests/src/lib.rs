//! Integration tests for the Lumen storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumen-integration-tests
//! ```
//!
//! Every test drives a fully assembled page in process: a real redb
//! session store in a temporary directory, a catalog loaded from a seed
//! file on disk, the in-memory surface, and a recording checkout
//! gateway. No network, no browser.

use std::path::PathBuf;

use tempfile::TempDir;

use lumen_storefront::catalog::JsonCatalogSource;
use lumen_storefront::config::StorefrontConfig;
use lumen_storefront::page::{RecordingGateway, Storefront};
use lumen_storefront::render::InMemorySurface;
use lumen_storefront::store::RedbStore;

/// The catalog every harness page loads.
///
/// Stock states are spelled out so tests know exactly which cards are
/// clickable: product 4 is the only one out of stock.
const CATALOG_SEED: &str = r#"[
  {"name": "Aviator Sol", "price": "59.99", "rating": 4, "featured": true},
  {"name": "Runner Deportivo", "price": "120.50", "rating": 5},
  {"name": "Lente Graduado Ejecutivo", "price": "159.00", "rating": 3},
  {"name": "Urbana Clasica", "price": "45.00", "rating": 2, "in_stock": false}
]"#;

/// One shopper's session: a temp directory holding the redb store and
/// the catalog seed file. Pages built from the same harness share state
/// like successive page loads in one browser.
pub struct TestHarness {
    dir: TempDir,
    config: StorefrontConfig,
}

impl TestHarness {
    /// Set up a fresh session directory with the standard test catalog.
    ///
    /// # Panics
    ///
    /// Panics when the temp directory or seed file cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("catalog.json"), CATALOG_SEED)
            .expect("Failed to write catalog seed");

        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        Self { dir, config }
    }

    /// Assemble a page load against this session's store and catalog.
    ///
    /// Only one page can hold the store file at a time; drop the previous
    /// page before assembling the next, as a browser would.
    ///
    /// # Panics
    ///
    /// Panics when the store cannot be opened or the catalog fails to load.
    #[must_use]
    pub fn page(&self) -> Storefront<RedbStore, RecordingGateway> {
        let store = RedbStore::open(self.config.store_path()).expect("Failed to open store");
        Storefront::assemble(
            &self.config,
            store,
            JsonCatalogSource::new(self.catalog_path()),
            Box::new(InMemorySurface::full_page()),
            RecordingGateway::default(),
        )
        .expect("Failed to assemble page")
    }

    /// Open the session store directly, bypassing the page.
    ///
    /// # Panics
    ///
    /// Panics when the store cannot be opened.
    #[must_use]
    pub fn raw_store(&self) -> RedbStore {
        RedbStore::open(self.config.store_path()).expect("Failed to open store")
    }

    /// Path of the catalog seed file.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("catalog.json")
    }

    /// The configuration every page of this session is assembled with.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
