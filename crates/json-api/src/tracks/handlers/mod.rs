//! Track Handlers

pub(crate) mod facets;
pub(crate) mod featured;
pub(crate) mod get;
pub(crate) mod index;
