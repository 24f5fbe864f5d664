//! Storefront services over the content store, payment gateway and email provider.

pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod content;
pub mod context;
pub mod fulfillment;
pub mod mail;
pub mod orders;
pub mod payments;
pub mod search;
pub mod secrets;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
