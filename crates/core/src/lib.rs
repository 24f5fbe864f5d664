//! Beatstore
//!
//! Beatstore is the storefront domain for selling beats: the track catalog and
//! its queries, the cart reducer, money in gateway minor units, the payment
//! state machine and the order metadata exchanged with the payment gateway.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod licenses;
pub mod metadata;
pub mod money;
pub mod payments;
pub mod prelude;
pub mod sequence;
pub mod tracks;
