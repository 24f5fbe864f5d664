//! Payment Handlers

pub(crate) mod callback;
pub(crate) mod initialize;
pub(crate) mod verify;
