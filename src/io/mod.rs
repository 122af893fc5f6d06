//! I/O module
//!
//! # Components
//!
//! - `spreadsheet` - worksheet load and save for csv and workbook files
//! - `csv_mirror` - CSV copy of API flow lookups
//! - `http` - blocking `ureq` clients for the API endpoints and the registry

pub mod csv_mirror;
pub mod http;
pub mod spreadsheet;

pub use csv_mirror::CsvMirror;
pub use http::{HttpLookupService, UreqTransport};
pub use spreadsheet::{output_path, Worksheet};
