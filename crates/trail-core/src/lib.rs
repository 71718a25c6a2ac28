//! Core types for the Trail resource gateway.
//!
//! Holds the resource model, the claims gate, the validator, the store
//! abstraction and the mutation pipeline. This crate is deliberately free of
//! HTTP and database dependencies.

pub mod book;
pub mod claims;
pub mod error;
pub mod info;
pub mod pipeline;
pub mod resource;
pub mod server;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
