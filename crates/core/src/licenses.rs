//! Licenses

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// License tiers offered on every track page.
pub const DEFAULT_LICENSES: [&str; 4] = [
    "Basic License",
    "Premium WAV License",
    "Unlimited License",
    "Exclusive License",
];

/// License errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LicenseError {
    /// License label was empty
    #[error("license type must not be empty")]
    Empty,
}

/// Label of the license a track is bought under.
///
/// The label is opaque to pricing; two lines for the same track differ only by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseType(String);

impl LicenseType {
    /// Create a license type from a non-empty label.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Empty`] if the label is blank.
    pub fn new(label: impl Into<String>) -> Result<Self, LicenseError> {
        let label = label.into();
        let trimmed = label.trim();

        if trimmed.is_empty() {
            return Err(LicenseError::Empty);
        }

        if trimmed.len() == label.len() {
            Ok(Self(label))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// The license label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LicenseType {
    type Error = LicenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LicenseType> for String {
    fn from(value: LicenseType) -> Self {
        value.0
    }
}
