//! Cart
//!
//! The cart is a value mutated only through [`Cart::apply`]. Each action is
//! resolved against a catalog snapshot, so a line always captures the price
//! the track had when it was added.

use rust_decimal::prelude::ToPrimitive;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    licenses::LicenseType,
    metadata::{MetadataItem, OrderMetadata},
    money::major_units,
    tracks::{Track, TrackId},
};

/// Cart errors
#[derive(Debug, Error)]
pub enum CartError {
    /// Track is priced in a different currency to the cart
    #[error("track {track} is priced in {found}, cart uses {expected}")]
    CurrencyMismatch {
        /// Track id
        track: TrackId,
        /// Cart currency code
        expected: &'static str,
        /// Track currency code
        found: &'static str,
    },

    /// Quantity does not fit a line item
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),

    /// Money arithmetic failed
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Cart actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one of the track under the license
    Add {
        /// Track id
        track_id: TrackId,
        /// License type
        license: LicenseType,
    },

    /// Remove every line for the track
    Remove {
        /// Track id
        track_id: TrackId,
    },

    /// Overwrite the quantity of every line for the track; `<= 0` removes them
    SetQuantity {
        /// Track id
        track_id: TrackId,
        /// New quantity
        quantity: i64,
    },

    /// Open or close the cart panel
    TogglePanel,

    /// Remove every line
    Clear,
}

/// Outcome of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// The cart changed
    Applied,

    /// The action referred to something that does not exist; the cart is unchanged
    Ignored,
}

/// A track bought under one license.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Track snapshot taken when the line was created
    pub track: Track,

    /// License type
    pub license: LicenseType,

    /// Quantity, always at least one
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        let unit = self.track.price.to_minor_units();

        Money::from_minor(
            unit.saturating_mul(i64::from(self.quantity)),
            self.track.price.currency(),
        )
    }

    fn matches(&self, track_id: &TrackId, license: &LicenseType) -> bool {
        &self.track.id == track_id && &self.license == license
    }
}

/// Shopping cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    is_open: bool,
    currency: &'static Currency,
    total: Money<'static, Currency>,
}

impl Cart {
    /// Create an empty, closed cart.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
            currency,
            total: Money::from_minor(0, currency),
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart panel is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Apply an action.
    ///
    /// # Errors
    ///
    /// Returns an error if the track's currency differs from the cart's, or a
    /// quantity would overflow. The cart is unchanged on error.
    pub fn apply(&mut self, action: CartAction, catalog: &Catalog) -> Result<Reduction, CartError> {
        let reduction = match action {
            CartAction::Add { track_id, license } => match catalog.by_id(track_id.as_str()) {
                Some(track) => self.add(track, license)?,
                None => Reduction::Ignored,
            },
            CartAction::Remove { track_id } => self.remove(&track_id),
            CartAction::SetQuantity { track_id, quantity } => {
                self.set_quantity(&track_id, quantity)?
            }
            CartAction::TogglePanel => {
                self.is_open = !self.is_open;

                Reduction::Applied
            }
            CartAction::Clear => {
                self.items.clear();

                Reduction::Applied
            }
        };

        if reduction == Reduction::Applied {
            self.total = self.compute_total()?;
        }

        Ok(reduction)
    }

    /// Gateway metadata describing this cart's lines.
    pub fn order_metadata(
        &self,
        customer_name: Option<String>,
        customer_phone: Option<String>,
    ) -> OrderMetadata {
        let items = self
            .items
            .iter()
            .map(|item| MetadataItem {
                track_id: item.track.id.clone(),
                track_title: Some(item.track.title.clone()),
                license_type: Some(item.license.to_string()),
                quantity: Some(item.quantity),
                price: major_units(&item.track.price).to_f64(),
            })
            .collect();

        OrderMetadata::Items {
            items,
            customer_name,
            customer_phone,
            customer_email: None,
            total_items: u64::try_from(self.len()).ok(),
            cart_uuid: None,
        }
    }

    fn add(&mut self, track: &Track, license: LicenseType) -> Result<Reduction, CartError> {
        if track.price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch {
                track: track.id.clone(),
                expected: self.currency.iso_alpha_code,
                found: track.price.currency().iso_alpha_code,
            });
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&track.id, &license))
        {
            line.quantity = line
                .quantity
                .checked_add(1)
                .ok_or(CartError::QuantityTooLarge(i64::from(line.quantity)))?;
        } else {
            self.items.push(LineItem {
                track: track.clone(),
                license,
                quantity: 1,
            });
        }

        Ok(Reduction::Applied)
    }

    fn remove(&mut self, track_id: &TrackId) -> Reduction {
        let before = self.items.len();

        self.items.retain(|line| &line.track.id != track_id);

        if self.items.len() == before {
            Reduction::Ignored
        } else {
            Reduction::Applied
        }
    }

    fn set_quantity(&mut self, track_id: &TrackId, quantity: i64) -> Result<Reduction, CartError> {
        if quantity <= 0 {
            return Ok(self.remove(track_id));
        }

        let quantity = u32::try_from(quantity).map_err(|_err| CartError::QuantityTooLarge(quantity))?;
        let mut reduction = Reduction::Ignored;

        for line in self.items.iter_mut().filter(|line| &line.track.id == track_id) {
            line.quantity = quantity;
            reduction = Reduction::Applied;
        }

        Ok(reduction)
    }

    fn compute_total(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |total, line| {
                total.add(line.subtotal())
            })
    }
}
