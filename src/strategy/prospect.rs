//! Prospect strategy
//!
//! Prospect spreadsheets have 16 columns. The six columns preceding the
//! trailing `Status` column receive the authorization and validity of each
//! product group, in the order correlatos, medicamentos, saneantes.

use crate::core::traits::LookupService;
use crate::io::Worksheet;
use crate::strategy::ProcessingStrategy;
use crate::types::{ConsultaError, Identifier, RegulatoryRecord, StrategyKind};

/// Number of group columns written before the status column
const GROUP_COLUMNS: usize = 6;

/// Strategy for prospective clients
#[derive(Clone, Copy)]
pub struct ProspectStrategy<'a> {
    lookup: &'a dyn LookupService,
}

impl<'a> ProspectStrategy<'a> {
    pub fn new(lookup: &'a dyn LookupService) -> Self {
        Self { lookup }
    }
}

impl ProcessingStrategy for ProspectStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Prospect
    }

    fn process_identifier(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
        self.lookup.lookup_prospect(cnpj)
    }

    fn write_result(
        &self,
        sheet: &mut Worksheet,
        row: usize,
        column: usize,
        record: &RegulatoryRecord,
    ) {
        let values = [
            &record.correlatos.autorizacao,
            &record.correlatos.validade,
            &record.medicamentos.autorizacao,
            &record.medicamentos.validade,
            &record.saneantes.autorizacao,
            &record.saneantes.validade,
        ];

        // Group columns must sit after the identifier column.
        if column > GROUP_COLUMNS + 1 {
            let first = column - GROUP_COLUMNS;
            for (offset, value) in values.iter().enumerate() {
                sheet.set(row, first + offset, value.as_str());
            }
        }

        sheet.set(row, column, record.status_line());
    }
}
