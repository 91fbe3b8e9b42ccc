//! Catalog data sources.
//!
//! A [`CatalogSource`] produces the seed list the engine loads at page
//! assembly. `load` consumes the source, so a catalog can only ever be
//! loaded once per page load.
//!
//! Three sources cover the storefront's needs: [`CardSource`] adapts
//! already-rendered product cards, [`JsonCatalogSource`] reads a catalog
//! file, and [`DemoSource`] synthesizes the demo store.

use std::path::PathBuf;

use lumen_core::{Currency, Money, ProductId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PLACEHOLDER_IMAGE;

use super::{CatalogError, Category, Product};

/// A normalized catalog record, before numbering and currency binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub rating: u8,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl ProductSeed {
    pub(crate) fn into_product(self, id: ProductId, currency: Currency) -> Product {
        let category = Category::infer(&self.name);
        let description = self
            .description
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| format!("Detailed description of {}", self.name));

        Product {
            id,
            price: Money::new(self.price, currency),
            image: self
                .image
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category,
            description,
            rating: self.rating.clamp(1, 5),
            in_stock: self.in_stock,
            featured: self.featured,
            name: self.name,
        }
    }
}

/// Where a catalog's products come from. Consumed on load; a source runs
/// exactly once.
pub trait CatalogSource {
    /// Produce the seed list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the underlying data cannot be read
    /// or parsed.
    fn load(self) -> Result<Vec<ProductSeed>, CatalogError>;
}

/// One already-rendered product card, reduced to its text content.
///
/// Every field is optional, mirroring how little a page fragment
/// guarantees: a card may lack a name, show no price, or have no image.
#[derive(Debug, Clone, Default)]
pub struct ProductCard {
    pub name: Option<String>,
    /// Price as displayed, e.g. `"$59.99"`. Parsed leniently.
    pub price_text: Option<String>,
    pub image: Option<String>,
}

/// Source that scrapes a list of rendered cards.
///
/// Cards carry no rating or featured flag, so those are synthesized from
/// a seeded generator: ratings uniform over 1 to 5, featured with
/// probability 0.3. Same seed, same catalog.
#[derive(Debug)]
pub struct CardSource {
    cards: Vec<ProductCard>,
    rng: StdRng,
}

impl CardSource {
    #[must_use]
    pub fn new(cards: Vec<ProductCard>, seed: u64) -> Self {
        Self {
            cards,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CatalogSource for CardSource {
    fn load(mut self) -> Result<Vec<ProductSeed>, CatalogError> {
        let seeds = self
            .cards
            .into_iter()
            .zip(1_usize..)
            .map(|(card, number)| ProductSeed {
                name: card
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| format!("Product {number}")),
                price: Money::parse_lenient(
                    card.price_text.as_deref().unwrap_or_default(),
                    Currency::USD,
                )
                .amount(),
                image: card.image,
                description: None,
                rating: self.rng.random_range(1..=5),
                in_stock: true,
                featured: self.rng.random_bool(0.3),
            })
            .collect();
        Ok(seeds)
    }
}

/// Source that reads a JSON seed file, as written by `lumen seed`.
#[derive(Debug)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(self) -> Result<Vec<ProductSeed>, CatalogError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let seeds = serde_json::from_str(&raw)?;
        Ok(seeds)
    }
}

/// Names, prices in cents, and images for the demo store.
const DEMO_CATALOG: &[(&str, i64, &str)] = &[
    ("Aviator Sol", 5999, "images/aviator-sol.jpg"),
    ("Runner Deportivo", 12050, "images/runner-deportivo.jpg"),
    ("Lente Graduado Ejecutivo", 15900, "images/graduado-ejecutivo.jpg"),
    ("Urbana Clasica", 4500, "images/urbana-clasica.jpg"),
    ("Gafas de Sol Retro", 7999, "images/sol-retro.jpg"),
    ("Sport Shield Pro", 21050, "images/sport-shield.jpg"),
    ("Graduado Ligero", 9900, "images/graduado-ligero.jpg"),
    ("Moda Milano", 6850, "images/moda-milano.jpg"),
    ("Sunset Polarizada", 11900, "images/sunset-polarizada.jpg"),
    ("Deportivo Trail", 4999, "images/deportivo-trail.jpg"),
];

/// Built-in demo catalog.
///
/// Ratings, featured flags, and stock are synthesized from the seed, so
/// a given seed always produces the same store.
#[derive(Debug, Clone, Copy)]
pub struct DemoSource {
    seed: u64,
}

impl DemoSource {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl CatalogSource for DemoSource {
    fn load(self) -> Result<Vec<ProductSeed>, CatalogError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds = DEMO_CATALOG
            .iter()
            .map(|&(name, cents, image)| ProductSeed {
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                image: Some(image.to_string()),
                description: None,
                rating: rng.random_range(1..=5),
                in_stock: rng.random_bool(0.85),
                featured: rng.random_bool(0.3),
            })
            .collect();
        Ok(seeds)
    }
}
