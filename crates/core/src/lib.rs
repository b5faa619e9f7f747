//! Telar Core - Shared domain library.
//!
//! This crate provides the domain logic shared by the Telar components:
//! - `storefront` - Public catalog, cart, and WhatsApp checkout handoff
//! - `admin` - Internal back-office for category/product management
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The cart store, catalog filter, and checkout handoff all
//! live here so they can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails
//! - [`cart`] - The shopping cart store
//! - [`catalog`] - Catalog entities and the filter/pagination model
//! - [`checkout`] - Shipping quote and WhatsApp order handoff
//! - [`slug`] - URL-safe slug generation
//! - [`marquee`] - Carousel auto-scroll state machine
//! - [`search`] - Sequence gate for incremental search results

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod marquee;
pub mod search;
pub mod slug;
pub mod types;

pub use types::*;
