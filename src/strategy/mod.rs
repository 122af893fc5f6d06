//! Processing strategy module
//!
//! A strategy knows how to look up one identifier for its record shape and
//! how to write the result back into a spreadsheet row. The set of shapes is
//! closed, so selection is a plain match over [`StrategyKind`].

use crate::core::traits::LookupService;
use crate::io::Worksheet;
use crate::types::{ConsultaError, Identifier, RegulatoryRecord, StrategyKind};

pub mod cliente;
pub mod prospect;

pub use cliente::ClienteStrategy;
pub use prospect::ProspectStrategy;

/// Header written into row 1 of the trailing column before processing
pub const STATUS_HEADER: &str = "Status";

/// Per-shape lookup and write-back behaviour
pub trait ProcessingStrategy {
    /// Record shape handled by this strategy
    fn kind(&self) -> StrategyKind;

    /// Look up one identifier
    ///
    /// A single pass per identifier: no retry, no caching. The Lookup
    /// Service error is returned as-is and aborts the run.
    fn process_identifier(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError>;

    /// Write the lookup result into `row`, whose trailing column is `column`
    fn write_result(
        &self,
        sheet: &mut Worksheet,
        row: usize,
        column: usize,
        record: &RegulatoryRecord,
    );

    /// Write the `Status` header into row 1 of the trailing column
    fn write_header(&self, sheet: &mut Worksheet, column: usize) {
        sheet.set(1, column, STATUS_HEADER);
    }
}

/// Create the strategy for `kind`, bound to a Lookup Service
pub fn create_strategy<'a>(
    kind: StrategyKind,
    lookup: &'a dyn LookupService,
) -> Box<dyn ProcessingStrategy + 'a> {
    match kind {
        StrategyKind::Cliente => Box::new(ClienteStrategy::new(lookup)),
        StrategyKind::Prospect => Box::new(ProspectStrategy::new(lookup)),
    }
}
