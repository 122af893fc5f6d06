//! Core business logic module
//!
//! - `traits` - Lookup Service and HTTP transport contracts
//! - `normalizer` - zero-padding of raw identifiers
//! - `format_detector` - record shape from spreadsheet width
//! - `source` - source selection and run configuration
//! - `schema` - candidate list JSON Schema
//! - `lock` - host-wide execution lock
//! - `batch_runner` - File flow
//! - `api_adapter` - API flow
//! - `pipeline` - one invocation: lock, configure, dispatch
//! - `progress` - progress bar on stderr

pub mod api_adapter;
pub mod batch_runner;
pub mod format_detector;
pub mod lock;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod source;
pub mod traits;

pub use api_adapter::{ApiReconciliation, ApiSummary};
pub use batch_runner::{BatchRunner, BatchSummary};
pub use format_detector::detect;
pub use lock::ExecutionLock;
pub use normalizer::normalize;
pub use pipeline::{Pipeline, RunOutcome};
pub use schema::validate_candidates;
pub use source::{parse_limit, select_source, RunConfig, Source};
pub use traits::{ApiTransport, LookupService};
