//! Client strategy
//!
//! Client spreadsheets have 8 columns. Only the trailing `Status` column is
//! written; the client's own data is left untouched.

use crate::core::traits::LookupService;
use crate::io::Worksheet;
use crate::strategy::ProcessingStrategy;
use crate::types::{ConsultaError, Identifier, RegulatoryRecord, StrategyKind};

/// Strategy for existing clients
#[derive(Clone, Copy)]
pub struct ClienteStrategy<'a> {
    lookup: &'a dyn LookupService,
}

impl<'a> ClienteStrategy<'a> {
    pub fn new(lookup: &'a dyn LookupService) -> Self {
        Self { lookup }
    }
}

impl ProcessingStrategy for ClienteStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Cliente
    }

    fn process_identifier(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
        self.lookup.lookup_cliente(cnpj)
    }

    fn write_result(
        &self,
        sheet: &mut Worksheet,
        row: usize,
        column: usize,
        record: &RegulatoryRecord,
    ) {
        sheet.set(row, column, record.status_line());
    }
}
