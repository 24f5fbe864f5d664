//! Content store
//!
//! HTTP client for the headless content store that owns tracks and orders.

pub mod client;
pub mod errors;
pub mod queries;

pub use client::{ContentStoreClient, ContentStoreConfig};
pub use errors::ContentStoreError;
