//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `identifier`: CNPJ identifier type
//! - `kind`: record-shape variants selected per run
//! - `record`: regulatory status records from the Lookup Service
//! - `payload`: inbound and outbound API payload shapes
//! - `error`: error types for the pipeline

pub mod error;
pub mod identifier;
pub mod kind;
pub mod payload;
pub mod record;

pub use error::ConsultaError;
pub use identifier::{Identifier, CNPJ_LENGTH};
pub use kind::{StrategyKind, CLIENTE_COLUMNS, PROSPECT_COLUMNS};
pub use payload::{reformat_validade, Candidate, CandidateList, ReconciliationReturn, ReturnRow};
pub use record::{AuthorizationGroup, RegulatoryRecord};
