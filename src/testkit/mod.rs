//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fixture`] - A wired-up cluster plus all four services.
//! - [`domain`] - Builders for carts, products, and filters.

pub mod domain;
pub mod fixture;
