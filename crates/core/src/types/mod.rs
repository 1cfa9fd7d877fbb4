//! Core types for EZTech.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod item;

pub use id::{ItemId, SUBSCRIPTION_ID_CEILING};
pub use item::{CartItem, CatalogItem};
