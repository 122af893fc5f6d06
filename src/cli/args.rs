use crate::core::progress::report_filter;
use crate::core::source::{parse_limit, select_source, RunConfig};
use crate::types::{ConsultaError, StrategyKind};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Lookup Service used when neither `--lookup-url` nor its variable is set
pub const DEFAULT_LOOKUP_URL: &str = "http://127.0.0.1:8080/anvisa";

/// Import CNPJ records and reconcile them against the ANVISA registry
#[derive(Parser, Debug, Clone)]
#[command(name = "consulta")]
#[command(
    about = "Import CNPJ records and reconcile them against the ANVISA registry",
    long_about = "Reads identifiers from a spreadsheet (--arquivo) or from an API endpoint \
                  pair (--apirequest/--apisend), looks each one up in the ANVISA registry \
                  and writes the result back. Only one import runs per host at a time."
)]
pub struct CliArgs {
    /// Spreadsheet to import; takes precedence over the API endpoints
    #[arg(short = 'a', long = "arquivo", value_name = "FILE")]
    pub arquivo: Option<PathBuf>,

    /// Declared record type: 'c' for clients, 'p' for prospects
    #[arg(
        short = 't',
        long = "tipo",
        value_name = "TYPE",
        help = "Record type (c|p); spreadsheets infer it from their column count"
    )]
    pub tipo: Option<StrategyKind>,

    /// Endpoint returning the candidate list
    #[arg(short = 'r', long = "apirequest", value_name = "URL")]
    pub apirequest: Option<String>,

    /// Endpoint receiving the reconciled payload
    #[arg(short = 's', long = "apisend", value_name = "URL")]
    pub apisend: Option<String>,

    /// Also write API lookups to output-<timestamp>.csv
    #[arg(short = 'c', long = "csv")]
    pub csv: bool,

    /// Maximum number of API candidates to process
    #[arg(
        short = 'l',
        long = "limite",
        value_name = "N",
        help = "Maximum number of API candidates to process (0 means no limit)"
    )]
    pub limite: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the registry Lookup Service
    #[arg(
        long = "lookup-url",
        value_name = "URL",
        env = "CONSULTA_LOOKUP_URL",
        default_value = DEFAULT_LOOKUP_URL
    )]
    pub lookup_url: String,

    /// Lock file shared by every import on the host
    #[arg(long = "lock-file", value_name = "PATH", env = "CONSULTA_LOCK_FILE")]
    pub lock_file: Option<PathBuf>,
}

impl CliArgs {
    /// Validate the arguments into a [`RunConfig`]
    ///
    /// The limit is checked first, then the source is selected.
    ///
    /// # Errors
    ///
    /// - `InvalidLimit` for a non-numeric `--limite`
    /// - `MissingSource` or `IncompleteApiConfig` from source selection
    pub fn to_run_config(&self) -> Result<RunConfig, ConsultaError> {
        let limit = parse_limit(self.limite.as_deref())?;
        let source = select_source(
            self.arquivo.as_deref(),
            self.apirequest.as_deref(),
            self.apisend.as_deref(),
        )?;

        Ok(RunConfig {
            source,
            limit,
            csv: self.csv,
            declared_kind: self.tipo,
        })
    }

    /// Default log filter: the `-v` level plus run milestones
    pub fn log_filter(&self) -> String {
        report_filter(self.log_level())
    }

    /// Log level for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
