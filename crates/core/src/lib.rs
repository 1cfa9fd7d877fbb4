//! EZTech Core - Shared types library.
//!
//! This crate provides common types used across all EZTech components:
//! - `cart` - Shared cart state engine
//! - `storefront` - Public-facing storefront site
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog ids, catalog entries, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
