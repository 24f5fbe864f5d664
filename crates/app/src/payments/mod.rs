//! Payments

pub mod errors;
pub mod gateway;
pub mod models;
pub mod references;
pub mod service;

pub use errors::{GatewayError, PaymentsServiceError};
pub use gateway::{HttpPaymentGateway, MockPaymentGateway, PaymentGateway};
pub use service::*;
