//! Beatstore prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAction, CartError, LineItem, Reduction},
    catalog::{Catalog, TrackFilter},
    licenses::{DEFAULT_LICENSES, LicenseError, LicenseType},
    metadata::{MetadataError, MetadataItem, OrderMetadata},
    money::{AmountError, currency_from_code, format_amount, from_minor_units, to_minor_units},
    payments::{PaymentState, PaymentTransitionError},
    sequence::{Latest, QuerySequencer, QueryTicket},
    tracks::{Track, TrackDocument, TrackError, TrackId},
};
