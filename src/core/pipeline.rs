//! One invocation of the importer
//!
//! Acquires the Execution Lock, turns the parsed arguments into a
//! [`RunConfig`] and dispatches to the File or API flow. The lock is held
//! until the flow returns, whatever the outcome.

use crate::cli::CliArgs;
use crate::core::api_adapter::{ApiReconciliation, ApiSummary};
use crate::core::batch_runner::{BatchRunner, BatchSummary};
use crate::core::lock::ExecutionLock;
use crate::core::source::{RunConfig, Source};
use crate::core::traits::{ApiTransport, LookupService};
use crate::types::ConsultaError;
use std::path::PathBuf;

/// How a run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run holds the lock; nothing was done
    Busy,
    File(BatchSummary),
    Api(ApiSummary),
}

/// Wires the collaborators of a run together
pub struct Pipeline<'a> {
    lookup: &'a dyn LookupService,
    transport: &'a dyn ApiTransport,
    csv_dir: PathBuf,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    /// `csv_dir` receives the CSV mirror when `--csv` is set
    pub fn new(
        lookup: &'a dyn LookupService,
        transport: &'a dyn ApiTransport,
        csv_dir: PathBuf,
    ) -> Self {
        Self {
            lookup,
            transport,
            csv_dir,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the importer for `args`
    ///
    /// Returns [`RunOutcome::Busy`] without validating anything else when the
    /// lock is taken.
    pub fn execute(&self, args: &CliArgs) -> Result<RunOutcome, ConsultaError> {
        let lock_path = args
            .lock_file
            .clone()
            .unwrap_or_else(ExecutionLock::default_path);

        let Some(_lock) = ExecutionLock::acquire(&lock_path)? else {
            tracing::info!(path = %lock_path.display(), "another import is running");
            return Ok(RunOutcome::Busy);
        };

        let config = args.to_run_config()?;
        self.run(&config)
    }

    /// Dispatch a validated configuration to its flow
    pub fn run(&self, config: &RunConfig) -> Result<RunOutcome, ConsultaError> {
        match &config.source {
            Source::File(path) => {
                if let Some(kind) = config.declared_kind {
                    tracing::debug!(declared = %kind, "declared type ignored, inferring from columns");
                }
                BatchRunner::new(self.lookup)
                    .with_progress(self.show_progress)
                    .run(path)
                    .map(RunOutcome::File)
            }
            Source::Api { request, send } => ApiReconciliation::new(self.transport, self.lookup)
                .with_limit(config.limit)
                .with_csv_mirror(config.csv.then(|| self.csv_dir.clone()))
                .with_declared_kind(config.declared_kind)
                .with_progress(self.show_progress)
                .run(request, send)
                .map(RunOutcome::Api),
        }
    }
}
