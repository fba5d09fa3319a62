//! Database abstraction layer
//!
//! The extractor only sees [`RelationalStore`]; the PostgreSQL adapter is
//! the production implementation and tests substitute in-memory fakes.

pub mod factory;
pub mod traits;

pub use factory::create_relational_store;
pub use traits::RelationalStore;
