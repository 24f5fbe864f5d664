//! Checkout

mod errors;
mod handlers;
mod models;

pub(crate) use errors::into_status_error as checkout_status_error;
pub(crate) use handlers::*;
pub(crate) use models::FulfillmentResponse;
