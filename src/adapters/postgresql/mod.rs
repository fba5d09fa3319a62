//! PostgreSQL database integration
//!
//! This module provides read access to the case-management database.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::row_to_json;
