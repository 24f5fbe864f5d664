//! Credentials for the external services.

use std::fmt;

use zeroize::Zeroize;

/// An API key or token, redacted in debug output and wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret {
    value: String,
}

impl ApiSecret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw secret, for building an authorization header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for ApiSecret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl From<String> for ApiSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
