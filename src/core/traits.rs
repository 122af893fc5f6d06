//! Collaborator contracts
//!
//! The pipeline talks to the outside world through two seams: the Lookup
//! Service that queries the regulatory registry, and the transport used by
//! the API flow. Both are blocking; the pipeline makes no progress while a
//! call is outstanding.

use crate::types::{ConsultaError, Identifier, RegulatoryRecord};

/// Regulatory registry lookup, one call per identifier
///
/// No retry or caching is expected from callers: each identifier is looked
/// up exactly once and any failure aborts the run.
pub trait LookupService {
    /// Look up an existing client
    fn lookup_cliente(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError>;

    /// Look up a prospective client
    fn lookup_prospect(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError>;
}

/// HTTP transport for the API flow
pub trait ApiTransport {
    /// GET `url` and return the response body
    fn fetch(&self, url: &str) -> Result<String, ConsultaError>;

    /// POST `body` to `url` and return the response body
    fn send(&self, url: &str, body: &str) -> Result<String, ConsultaError>;
}
