//! Spreadsheet format detection
//!
//! The record shape of a spreadsheet is inferred purely from how many
//! columns it has. Detection runs once, before any row is processed.

use crate::types::{ConsultaError, StrategyKind, CLIENTE_COLUMNS, PROSPECT_COLUMNS};

/// Select the processing strategy for a spreadsheet with `column_count` columns
///
/// # Errors
///
/// Returns `InvalidFileFormat` for any count other than 8 or 16.
pub fn detect(column_count: usize) -> Result<StrategyKind, ConsultaError> {
    match column_count {
        CLIENTE_COLUMNS => Ok(StrategyKind::Cliente),
        PROSPECT_COLUMNS => Ok(StrategyKind::Prospect),
        found => Err(ConsultaError::InvalidFileFormat { found }),
    }
}
