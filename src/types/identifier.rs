//! CNPJ identifier type
//!
//! The canonical form of a CNPJ is 14 decimal digits, zero-padded on the
//! left. The type itself does not enforce that form: the File flow builds
//! identifiers through the normalizer, while the API flow forwards the
//! inbound `CNPJ` text unchanged.

use std::fmt;

/// Length of a canonical CNPJ
pub const CNPJ_LENGTH: usize = 14;

/// A company tax identifier as handed to the Lookup Service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an identifier without touching its content
    pub fn new(value: impl Into<String>) -> Self {
        Identifier(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is exactly 14 ASCII digits
    pub fn is_canonical(&self) -> bool {
        self.0.len() == CNPJ_LENGTH && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
