//! Mail
//!
//! Transactional email through the provider's HTTP API.

pub mod errors;
pub mod mailer;
pub mod templates;

pub use errors::MailError;
pub use mailer::*;
pub use templates::{PurchaseConfirmation, purchase_confirmation};
