//! Fulfillment

pub mod errors;
pub mod models;
pub mod service;

pub use errors::FulfillmentError;
pub use models::{FulfillmentReceipt, FulfillmentRequest};
pub use service::*;
