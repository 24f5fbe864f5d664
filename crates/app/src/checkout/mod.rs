//! Checkout
//!
//! Ties a verified payment to its fulfillment.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutError;
pub use models::Completion;
pub use service::*;
