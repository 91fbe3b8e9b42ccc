//! Lumen Core - Shared types library.
//!
//! This crate provides common types used across all Lumen components:
//! - `storefront` - The shopper-facing storefront engine
//! - `cli` - Command-line tools for seeding and session inspection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
