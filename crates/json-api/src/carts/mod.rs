//! Carts

mod errors;
mod handlers;
pub(crate) mod items;
mod models;

pub(crate) use handlers::*;

#[cfg(test)]
pub(crate) use models::CartResponse;
