//! Identifier normalization
//!
//! Spreadsheet cells often lose the leading zeros of a CNPJ because they are
//! stored as numbers. Normalization restores them by left-padding with `0`
//! up to 14 characters. Longer inputs pass through untouched and no digit
//! check is made; a malformed identifier surfaces later as a lookup failure.

use crate::types::{Identifier, CNPJ_LENGTH};

/// Left-pad a raw identifier with zeros to the canonical CNPJ length
pub fn normalize(raw: &str) -> Identifier {
    Identifier::new(format!("{:0>width$}", raw, width = CNPJ_LENGTH))
}
