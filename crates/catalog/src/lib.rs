//! Catalog layer providing business-oriented read and soft-delete operations
//! on top of the entity definitions in the `models` crate.
//! - Separates query construction from HTTP handling.
//! - Provides clear error types and bounded query execution.

pub mod errors;
pub mod query;
pub mod services;
