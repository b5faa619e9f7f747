//! Telar storefront library.
//!
//! The public shop: catalog browsing, search, the session-backed cart, and
//! the WhatsApp checkout handoff. Exposed as a library so routes and views
//! can be tested without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
