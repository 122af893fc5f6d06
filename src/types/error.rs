//! Error types for the ANVISA reconciliation pipeline
//!
//! Every variant is fatal: the run aborts on the first error and nothing is
//! retried or downgraded to a per-record skip. The binary prints the message
//! followed by a hint to consult `--help`.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing source, incomplete API endpoints, bad limit
//! - **Input Errors**: missing file, wrong column count, schema violations
//! - **Processing Errors**: lookup failures, malformed validity dates
//! - **Transport Errors**: network failures, I/O, spreadsheet and CSV plumbing

use thiserror::Error;

/// Main error type for the reconciliation pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsultaError {
    /// Neither a file nor an API endpoint was supplied
    #[error("A spreadsheet file or an API endpoint pair is required to run the import")]
    MissingSource,

    /// Only one of the two API endpoints was supplied
    #[error("Argument [{endpoint}] requires a valid url")]
    IncompleteApiConfig {
        /// Name of the missing endpoint option (`apirequest` or `apisend`)
        endpoint: String,
    },

    /// The execution limit is not numeric
    #[error("Limit must be numeric, got '{value}'")]
    InvalidLimit {
        /// The rejected limit text
        value: String,
    },

    /// Input spreadsheet does not exist
    #[error("File [{path}] does not exist\n\nProvide an xlsx file as data input.")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// Spreadsheet column count selects no known layout
    #[error("Invalid file format: found {found} columns\n\nThe file must have 8 columns for clients and 16 for prospects")]
    InvalidFileFormat {
        /// Highest populated column of the sheet
        found: usize,
    },

    /// Inbound API payload does not match the candidate schema
    #[error("Schema validation failed: {}", errors.join("; "))]
    SchemaValidation {
        /// One message per violation, prefixed by the instance path
        errors: Vec<String>,
    },

    /// The Lookup Service failed for an identifier
    #[error("Lookup failed for CNPJ {cnpj}: {message}")]
    LookupFailure {
        /// Identifier as sent to the Lookup Service
        cnpj: String,
        /// Description of the failure
        message: String,
    },

    /// Fetching from or posting to an API endpoint failed
    #[error("Network error for {url}: {message}")]
    Network {
        /// Endpoint that failed
        url: String,
        /// Description of the failure
        message: String,
    },

    /// A validity date is not in `day/month/year` form
    #[error("Malformed validity date '{value}', expected dd/mm/yyyy")]
    MalformedDate {
        /// The unparseable date text
        value: String,
    },

    /// I/O error while reading or writing local files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Spreadsheet could not be read or written
    #[error("Spreadsheet error: {message}")]
    Spreadsheet {
        /// Description of the spreadsheet error
        message: String,
    },

    /// JSON could not be parsed or serialized
    #[error("JSON error: {message}")]
    Json {
        /// Description of the JSON error
        message: String,
    },

    /// CSV output could not be written
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error
        message: String,
    },
}

impl From<std::io::Error> for ConsultaError {
    fn from(error: std::io::Error) -> Self {
        ConsultaError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ConsultaError {
    fn from(error: csv::Error) -> Self {
        ConsultaError::Csv {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConsultaError {
    fn from(error: serde_json::Error) -> Self {
        ConsultaError::Json {
            message: error.to_string(),
        }
    }
}

impl From<calamine::Error> for ConsultaError {
    fn from(error: calamine::Error) -> Self {
        ConsultaError::Spreadsheet {
            message: error.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ConsultaError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        ConsultaError::Spreadsheet {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ConsultaError {
    /// Create an IncompleteApiConfig error
    pub fn incomplete_api_config(endpoint: &str) -> Self {
        ConsultaError::IncompleteApiConfig {
            endpoint: endpoint.to_string(),
        }
    }

    /// Create an InvalidLimit error
    pub fn invalid_limit(value: &str) -> Self {
        ConsultaError::InvalidLimit {
            value: value.to_string(),
        }
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        ConsultaError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create a LookupFailure error
    pub fn lookup_failure(cnpj: &str, message: impl Into<String>) -> Self {
        ConsultaError::LookupFailure {
            cnpj: cnpj.to_string(),
            message: message.into(),
        }
    }

    /// Create a Network error
    pub fn network(url: &str, message: impl Into<String>) -> Self {
        ConsultaError::Network {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Create a MalformedDate error
    pub fn malformed_date(value: &str) -> Self {
        ConsultaError::MalformedDate {
            value: value.to_string(),
        }
    }
}
