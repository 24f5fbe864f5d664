//! Orders

pub mod errors;
pub mod models;
pub mod service;

pub use errors::OrdersServiceError;
pub use models::{NewOrder, OrderId, PAYMENT_PROVIDER};
pub use service::*;
