//! SQLite backend for the Trail resource store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

/// Bounds the blanket `ResourceStore` impl on [`SqliteStore`].
pub use encode::Table;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
