//! Telar admin panel library.
//!
//! Catalog management for the Telar storefront: categories, products, and
//! product images, behind an email/password login. Exposed as a library so
//! forms, services, and views can be tested without a running server.
//!
//! This crate is the only writer of the `catalog` schema; the storefront
//! reads it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
