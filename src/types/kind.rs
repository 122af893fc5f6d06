//! Record-shape variants
//!
//! A spreadsheet selects its variant by column count. The API flow always
//! runs as [`StrategyKind::Cliente`]; its `--tipo` flag is informational.

use clap::ValueEnum;
use std::fmt;

/// Column count of a client spreadsheet
pub const CLIENTE_COLUMNS: usize = 8;

/// Column count of a prospect spreadsheet
pub const PROSPECT_COLUMNS: usize = 16;

/// Processing strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Existing clients, 8-column spreadsheets
    #[value(alias = "c")]
    Cliente,

    /// Prospective clients, 16-column spreadsheets
    #[value(alias = "p")]
    Prospect,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Cliente => f.write_str("cliente"),
            StrategyKind::Prospect => f.write_str("prospect"),
        }
    }
}
