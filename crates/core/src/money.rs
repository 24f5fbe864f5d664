//! Money
//!
//! Display amounts are decimals in major units ("39.95"). The payment gateway
//! speaks integer minor units (3995). Conversion between the two happens here
//! and nowhere else, so a round trip never drifts.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Number of decimal places in a major unit amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors converting or validating amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Amount is zero or negative
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Decimal),

    /// Amount does not fit in minor units
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),

    /// Currency code is not supported by the store
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Converts a major unit amount to gateway minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] if the scaled amount overflows an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, AmountError> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(AmountError::OutOfRange(amount))
}

/// Converts gateway minor units back to a major unit amount.
pub fn from_minor_units(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, MINOR_UNIT_SCALE)
}

/// Converts a positive major unit amount to minor units.
///
/// # Errors
///
/// Returns [`AmountError::NotPositive`] for amounts that are not at least one
/// minor unit once rounded.
pub fn positive_minor_units(amount: Decimal) -> Result<i64, AmountError> {
    match to_minor_units(amount)? {
        minor if minor > 0 => Ok(minor),
        _ => Err(AmountError::NotPositive(amount)),
    }
}

/// Builds a money value from a major unit amount.
///
/// # Errors
///
/// Returns an error if the amount does not fit in minor units.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, AmountError> {
    Ok(Money::from_minor(to_minor_units(amount)?, currency))
}

/// Major unit amount of a money value.
pub fn major_units(money: &Money<'_, Currency>) -> Decimal {
    from_minor_units(money.to_minor_units())
}

/// Formats a money value as `"<CODE> <amount>"`, e.g. `"GHS 39.95"`.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    format!(
        "{} {}",
        money.currency().iso_alpha_code,
        major_units(money)
    )
}

/// Resolves an ISO currency code accepted by the store.
///
/// # Errors
///
/// Returns [`AmountError::UnknownCurrency`] for codes the store does not sell in.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, AmountError> {
    let currency = match code.trim().to_ascii_uppercase().as_str() {
        "GHS" => iso::GHS,
        "NGN" => iso::NGN,
        "KES" => iso::KES,
        "ZAR" => iso::ZAR,
        "USD" => iso::USD,
        "GBP" => iso::GBP,
        "EUR" => iso::EUR,
        _ => return Err(AmountError::UnknownCurrency(code.to_string())),
    };

    Ok(currency)
}
