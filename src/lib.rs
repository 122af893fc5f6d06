//! ANVISA Reconciliation Library
//! # Overview
//!
//! This library imports company identifiers (CNPJ), looks each one up in the
//! ANVISA regulatory registry and writes the authorization status back to
//! where the identifiers came from.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Identifier, RegulatoryRecord, payloads, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::batch_runner`] - File flow over a spreadsheet
//!   - [`core::api_adapter`] - API flow between two HTTP endpoints
//!   - [`core::lock`] - host-wide execution lock
//!   - [`core::pipeline`] - lock, configure and dispatch one run
//! - [`strategy`] - Cliente and Prospect lookup and write-back
//! - [`io`] - Spreadsheet, CSV mirror and HTTP adapters
//!
//! # Flows
//!
//! - **File**: every data row of an 8-column (client) or 16-column
//!   (prospect) spreadsheet gets a `Status` cell; the result is saved as
//!   `output-<name>` next to the input.
//! - **API**: a candidate list is fetched, validated against a JSON Schema,
//!   looked up up to an optional limit and posted back as an `ANVISA` array,
//!   optionally mirrored to a local CSV file.
//!
//! Both flows stop at the first error; nothing partial is saved or sent.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{
    ApiReconciliation, ApiTransport, BatchRunner, ExecutionLock, LookupService, Pipeline,
    RunOutcome,
};
pub use crate::io::{HttpLookupService, UreqTransport, Worksheet};
pub use crate::types::{ConsultaError, Identifier, RegulatoryRecord, StrategyKind};
