//! CSV mirror of API lookups
//!
//! When requested, every candidate processed by the API flow is also written
//! to a local `output-<timestamp>.csv` file, one row per lookup, stamped with
//! the time the lookup completed.

use crate::types::{ConsultaError, Identifier, RegulatoryRecord};
use chrono::NaiveDateTime;
use csv::Writer;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header row of the mirror file
pub const MIRROR_HEADER: [&str; 9] = [
    "cnpj",
    "correlatos-autorizacao",
    "correlatos-validade",
    "medicamentos-autorizacao",
    "medicamentos-validade",
    "saneantes-autorizacao",
    "saneantes-validade",
    "status",
    "data-consulta",
];

const FILE_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const ROW_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Open CSV mirror file
#[derive(Debug)]
pub struct CsvMirror {
    writer: Writer<File>,
    path: PathBuf,
}

impl CsvMirror {
    /// Create `output-<YYYYmmddHHMMSS>.csv` in `dir` and write the header
    pub fn create(dir: &Path, started_at: NaiveDateTime) -> Result<Self, ConsultaError> {
        let path = dir.join(format!("output-{}.csv", started_at.format(FILE_STAMP_FORMAT)));
        let mut writer = Writer::from_path(&path)?;
        writer.write_record(MIRROR_HEADER)?;
        tracing::info!(path = %path.display(), "writing CSV mirror");
        Ok(CsvMirror { writer, path })
    }

    /// Append the lookup result for one candidate
    pub fn append(
        &mut self,
        cnpj: &Identifier,
        record: &RegulatoryRecord,
        consulted_at: NaiveDateTime,
    ) -> Result<(), ConsultaError> {
        let consulted_at = consulted_at.format(ROW_STAMP_FORMAT).to_string();
        self.writer.write_record([
            cnpj.as_str(),
            record.correlatos.autorizacao.as_str(),
            record.correlatos.validade.as_str(),
            record.medicamentos.autorizacao.as_str(),
            record.medicamentos.validade.as_str(),
            record.saneantes.autorizacao.as_str(),
            record.saneantes.validade.as_str(),
            record.status.as_deref().unwrap_or(""),
            consulted_at.as_str(),
        ])?;
        Ok(())
    }

    /// Flush and close the file, returning its path
    pub fn finish(mut self) -> Result<PathBuf, ConsultaError> {
        self.writer.flush()?;
        Ok(self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
