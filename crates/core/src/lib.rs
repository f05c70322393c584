//! Velaris Core - Shared types library.
//!
//! This crate provides common types used across all Velaris components:
//! - `server` - Public catalog API and admin back office
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the inquiry status vocabulary
//! - [`slug`] - URL-safe identifiers derived from product names
//! - [`input`] - Lenient parsing of form and JSON field values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod input;
pub mod slug;
pub mod types;

pub use input::{FlagInput, StockInput, parse_flag, resolve_flag};
pub use slug::{FALLBACK_SLUG, base_slug, slugify, with_suffix};
pub use types::*;
