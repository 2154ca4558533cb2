//! Row models for catalog tables.
//!
//! Each row type converts into the matching `storefront_core` domain type;
//! the database layer never hands rows to callers.

pub mod category;
pub mod product;
pub mod store;
