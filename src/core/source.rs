//! Source selection and run configuration
//!
//! A run reads identifiers from exactly one place: a spreadsheet file or a
//! pair of API endpoints. A file always wins when both are supplied.

use crate::types::{ConsultaError, StrategyKind};
use std::path::{Path, PathBuf};

/// Where identifiers come from and where results go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Spreadsheet read from and written next to `path`
    File(PathBuf),

    /// Candidate list fetched from `request`, results posted to `send`
    Api { request: String, send: String },
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: Source,

    /// Maximum number of API candidates to process
    pub limit: Option<usize>,

    /// Mirror API lookups into a local CSV file
    pub csv: bool,

    /// Declared record shape; informational for the API flow, ignored for files
    pub declared_kind: Option<StrategyKind>,
}

/// Pick the run's source from the supplied options
///
/// # Errors
///
/// - `MissingSource` when neither a file nor an endpoint is supplied
/// - `IncompleteApiConfig` when only one of the two endpoints is supplied
pub fn select_source(
    file: Option<&Path>,
    request: Option<&str>,
    send: Option<&str>,
) -> Result<Source, ConsultaError> {
    let request = request.filter(|url| !url.is_empty());
    let send = send.filter(|url| !url.is_empty());

    if let Some(path) = file.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(Source::File(path.to_path_buf()));
    }

    match (request, send) {
        (None, None) => Err(ConsultaError::MissingSource),
        (None, Some(_)) => Err(ConsultaError::incomplete_api_config("apirequest")),
        (Some(_), None) => Err(ConsultaError::incomplete_api_config("apisend")),
        (Some(request), Some(send)) => Ok(Source::Api {
            request: request.to_string(),
            send: send.to_string(),
        }),
    }
}

/// Parse the optional candidate limit
///
/// An empty value or `0` means "no limit".
///
/// # Errors
///
/// Returns `InvalidLimit` for anything that is not a non-negative integer.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, ConsultaError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(limit) => Ok(Some(limit)),
        Err(_) => Err(ConsultaError::invalid_limit(raw)),
    }
}
