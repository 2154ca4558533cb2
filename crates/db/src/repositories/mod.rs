//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async read methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod language_repo;
pub mod product_repo;
pub mod store_repo;

pub use category_repo::CategoryRepo;
pub use language_repo::LanguageRepo;
pub use product_repo::ProductRepo;
pub use store_repo::StoreRepo;
