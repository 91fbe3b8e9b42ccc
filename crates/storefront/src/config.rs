//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Every variable is optional; the defaults suit the demo store.
//!
//! - `LUMEN_DATA_DIR` - Directory holding the session store file (default: `.lumen`)
//! - `LUMEN_CURRENCY` - ISO 4217 code for display prices (default: `USD`)
//! - `LUMEN_CHECKOUT_URL` - Handoff target for checkout (default: `checkout.html`)
//! - `LUMEN_FREE_SHIPPING_OVER` - Free-shipping threshold, exclusive (default: `100`)
//! - `LUMEN_FLAT_SHIPPING` - Flat shipping rate at or below the threshold (default: `10`)
//! - `LUMEN_TAX_RATE` - Tax rate applied to the subtotal (default: `0.10`)
//! - `LUMEN_SEARCH_DEBOUNCE_MS` - Quiet window before a search commits (default: `300`)
//! - `LUMEN_TOAST_TTL_MS` - Toast auto-dismiss delay (default: `3000`)
//! - `LUMEN_DEMO_SEED` - Seed for the demo catalog generator (default: `7`)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lumen_core::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Pricing rules applied when deriving cart totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Shipping is waived when the subtotal strictly exceeds this amount
    pub free_shipping_over: Decimal,
    /// Flat shipping rate charged at or below the threshold
    pub flat_shipping: Decimal,
    /// Tax rate applied to the subtotal
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_over: Decimal::new(100, 0),
            flat_shipping: Decimal::new(10, 0),
            tax_rate: Decimal::new(10, 2),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the session store file
    pub data_dir: PathBuf,
    /// Display currency for every price on the page
    pub currency: Currency,
    /// Where checkout hands the shopper off to
    pub checkout_url: String,
    /// Shipping and tax rules
    pub pricing: PricingPolicy,
    /// Quiet window before a search query commits
    pub search_debounce: Duration,
    /// How long a toast stays on screen
    pub toast_ttl: Duration,
    /// Seed for the demo catalog generator
    pub demo_seed: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".lumen"),
            currency: Currency::USD,
            checkout_url: "checkout.html".to_string(),
            pricing: PricingPolicy::default(),
            search_debounce: Duration::from_millis(300),
            toast_ttl: Duration::from_millis(3000),
            demo_seed: 7,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present, then
    /// falls back to the defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let currency_code = get_env_or_default("LUMEN_CURRENCY", defaults.currency.code());
        let currency = Currency::from_code(&currency_code).ok_or_else(|| {
            ConfigError::InvalidEnvVar("LUMEN_CURRENCY".to_string(), currency_code.clone())
        })?;

        let pricing = PricingPolicy {
            free_shipping_over: get_env_parsed(
                "LUMEN_FREE_SHIPPING_OVER",
                defaults.pricing.free_shipping_over,
            )?,
            flat_shipping: get_env_parsed("LUMEN_FLAT_SHIPPING", defaults.pricing.flat_shipping)?,
            tax_rate: get_env_parsed("LUMEN_TAX_RATE", defaults.pricing.tax_rate)?,
        };

        Ok(Self {
            data_dir: PathBuf::from(get_env_or_default("LUMEN_DATA_DIR", ".lumen")),
            currency,
            checkout_url: get_env_or_default("LUMEN_CHECKOUT_URL", &defaults.checkout_url),
            pricing,
            search_debounce: Duration::from_millis(get_env_parsed(
                "LUMEN_SEARCH_DEBOUNCE_MS",
                300_u64,
            )?),
            toast_ttl: Duration::from_millis(get_env_parsed("LUMEN_TOAST_TTL_MS", 3000_u64)?),
            demo_seed: get_env_parsed("LUMEN_DEMO_SEED", defaults.demo_seed)?,
        })
    }

    /// Returns the path of the session store file inside the data directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("session.redb")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, with a default when unset.
fn get_env_parsed<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(key.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
