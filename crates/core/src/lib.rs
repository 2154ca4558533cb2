//! Storefront search domain.
//!
//! Holds the request-scoped types shared by every layer (stores, languages,
//! catalog entries, index hits and facet buckets), the collaborator traits the
//! search pipeline is wired against, and the pure helpers it needs: native
//! query builders, price formatting and image path resolution.
//!
//! This crate has no internal dependencies so the database, index client and
//! HTTP crates can all build on it.

pub mod catalog;
pub mod error;
pub mod images;
pub mod index;
pub mod pricing;
pub mod search;
pub mod store;
pub mod types;
