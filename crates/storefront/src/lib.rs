//! Lumen storefront library.
//!
//! Client-side page logic for the Lumen eyewear shop: the cart, the
//! catalog filter pipeline, the product detail stepper, and the page
//! assembly that renders them into a host-provided surface. Everything
//! here is deterministic; the host owns the clock and the event loop.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod controls;
pub mod filters;
pub mod notify;
pub mod page;
pub mod product_page;
pub mod render;
pub mod store;
pub mod timer;

/// Fallback art for products without an image of their own.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.jpg";
