//! File flow
//!
//! Reconciles every data row of a spreadsheet and saves the result next to
//! the input as `output-<name>`.
//!
//! # Pipeline
//!
//! ```text
//! load sheet → detect format → Status header → rows 2..=last
//!     (normalize → lookup → write back) → save output-<name>
//! ```
//!
//! The loop is fail-fast: the first lookup failure aborts the run and the
//! output file is never written.

use crate::core::format_detector::detect;
use crate::core::normalizer::normalize;
use crate::core::progress::{Progress, REPORT_TARGET};
use crate::core::traits::LookupService;
use crate::io::{output_path, Worksheet};
use crate::strategy::create_strategy;
use crate::types::{ConsultaError, StrategyKind};
use std::path::{Path, PathBuf};

/// First spreadsheet row holding data; row 1 is the header
pub const FIRST_DATA_ROW: usize = 2;

/// Outcome of a completed File flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub kind: StrategyKind,
    /// Number of data rows reconciled
    pub rows: usize,
    /// Path of the saved output spreadsheet
    pub output: PathBuf,
}

/// Runs the File flow against a Lookup Service
pub struct BatchRunner<'a> {
    lookup: &'a dyn LookupService,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(lookup: &'a dyn LookupService) -> Self {
        Self {
            lookup,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Reconcile the spreadsheet at `input`
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if `input` does not exist
    /// - `InvalidFileFormat` if the sheet is neither 8 nor 16 columns wide
    /// - `LookupFailure` for the first identifier the Lookup Service rejects
    /// - spreadsheet or I/O errors while loading or saving
    pub fn run(&self, input: &Path) -> Result<BatchSummary, ConsultaError> {
        if !input.exists() {
            return Err(ConsultaError::file_not_found(&input.display().to_string()));
        }

        let mut sheet = Worksheet::load(input)?;
        let status_column = sheet.highest_column();
        let kind = detect(status_column)?;
        let strategy = create_strategy(kind, self.lookup);

        strategy.write_header(&mut sheet, status_column);

        let last_row = sheet.highest_row();
        let rows = last_row.saturating_sub(FIRST_DATA_ROW - 1);
        tracing::info!(target: REPORT_TARGET, rows, file = %input.display(), "importing {}", kind);

        let progress = Progress::new(rows as u64, self.show_progress);
        for row in FIRST_DATA_ROW..=last_row {
            let cnpj = normalize(sheet.get(row, 1));
            tracing::debug!(row, %cnpj, "processing row");
            if !cnpj.is_canonical() {
                tracing::warn!(row, %cnpj, "identifier is not a 14-digit CNPJ");
            }

            let record = strategy.process_identifier(&cnpj)?;
            strategy.write_result(&mut sheet, row, status_column, &record);
            progress.advance();
        }

        progress.set_message("Saving file");
        let output = output_path(input);
        sheet.save(&output)?;
        progress.finish();

        tracing::info!(output = %output.display(), "spreadsheet saved");
        Ok(BatchSummary { kind, rows, output })
    }
}
