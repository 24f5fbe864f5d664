//! Cart Models

use beatstore::cart::Cart;
use jiff::Timestamp;

use crate::uuids::TypedUuid;

pub type CartUuid = TypedUuid<CartSession>;

/// A cart hosted by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSession {
    pub uuid: CartUuid,
    pub cart: Cart,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
