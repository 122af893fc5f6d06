//! ANVISA reconciliation CLI
//!
//! # Usage
//!
//! ```bash
//! consulta --arquivo clientes.xlsx
//! consulta --apirequest http://erp/candidatos --apisend http://erp/retorno --limite 50 --csv
//! consulta -vv -a prospects.xlsx
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success, or another import already running
//! - 1: Error (missing source, file not found, invalid format, lookup failure, etc.)

use consulta_anvisa::cli::{self, CliArgs};
use consulta_anvisa::core::{Pipeline, RunOutcome};
use consulta_anvisa::io::{HttpLookupService, UreqTransport};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const HELP_HINT: &str = "Run the command below for more information:\n  consulta --help";

fn main() {
    let args = cli::parse_args();
    init_tracing(&args);

    let lookup = HttpLookupService::new(args.lookup_url.clone());
    let transport = UreqTransport::new();
    let csv_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let pipeline = Pipeline::new(&lookup, &transport, csv_dir).with_progress(true);
    match pipeline.execute(&args) {
        Ok(RunOutcome::Busy) => {
            println!("Another import is already running on this host, nothing to do.");
        }
        Ok(RunOutcome::File(summary)) => {
            println!(
                "Imported {} {} rows into {}",
                summary.rows,
                summary.kind,
                summary.output.display()
            );
        }
        Ok(RunOutcome::Api(summary)) => {
            println!("Reconciled {} of {} candidates", summary.processed, summary.total);
            if let Some(path) = summary.csv_path {
                println!("CSV written to {}", path.display());
            }
        }
        Err(e) => {
            println!("{}\n\n{}", e, HELP_HINT);
            process::exit(1);
        }
    }
}

/// Log to stderr at the `-v` level, milestones always, unless `RUST_LOG` says otherwise
fn init_tracing(args: &CliArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
