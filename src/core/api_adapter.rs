//! API flow
//!
//! Fetches a candidate list from the request endpoint, validates it, looks up
//! each candidate in list order and posts the reconciled payload to the send
//! endpoint.
//!
//! # Pipeline
//!
//! ```text
//! GET request → parse JSON → schema check → CandidateList
//!     → candidates[0..bound] (lookup → CSV mirror row → ReturnRow)
//!     → ReconciliationReturn { ANVISA, ..extras } → POST send
//! ```
//!
//! Candidates use the `Cliente` lookup and their `CNPJ` is passed through
//! as received; unlike the File flow no zero-padding is applied. The CSV
//! mirror is closed before anything is posted.

use crate::core::progress::{Progress, REPORT_TARGET};
use crate::core::schema::validate_candidates;
use crate::core::traits::{ApiTransport, LookupService};
use crate::io::CsvMirror;
use crate::strategy::create_strategy;
use crate::types::{
    CandidateList, ConsultaError, Identifier, ReconciliationReturn, ReturnRow, StrategyKind,
};
use chrono::Local;
use serde_json::Value;
use std::path::PathBuf;

/// Outcome of a completed API flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSummary {
    /// Candidates received from the request endpoint
    pub total: usize,
    /// Candidates looked up and returned
    pub processed: usize,
    /// CSV mirror file, when requested
    pub csv_path: Option<PathBuf>,
    /// Body returned by the send endpoint
    pub reply: String,
}

/// Runs the API flow against a transport and a Lookup Service
pub struct ApiReconciliation<'a> {
    transport: &'a dyn ApiTransport,
    lookup: &'a dyn LookupService,
    limit: Option<usize>,
    csv_dir: Option<PathBuf>,
    declared_kind: Option<StrategyKind>,
    show_progress: bool,
}

impl<'a> ApiReconciliation<'a> {
    pub fn new(transport: &'a dyn ApiTransport, lookup: &'a dyn LookupService) -> Self {
        Self {
            transport,
            lookup,
            limit: None,
            csv_dir: None,
            declared_kind: None,
            show_progress: false,
        }
    }

    /// Process at most `limit` candidates
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Mirror every lookup into `output-<timestamp>.csv` inside `dir`
    pub fn with_csv_mirror(mut self, dir: Option<PathBuf>) -> Self {
        self.csv_dir = dir;
        self
    }

    /// Record the declared type; it does not change processing
    pub fn with_declared_kind(mut self, kind: Option<StrategyKind>) -> Self {
        self.declared_kind = kind;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the whole flow: fetch, validate, reconcile, send
    ///
    /// # Errors
    ///
    /// - `Network` if either endpoint fails
    /// - `Json` if the request endpoint does not return JSON
    /// - `SchemaValidation` if the payload does not match the candidate schema
    /// - `LookupFailure` or `MalformedDate` for the first bad candidate
    pub fn run(&self, request_url: &str, send_url: &str) -> Result<ApiSummary, ConsultaError> {
        if let Some(kind) = self.declared_kind {
            tracing::info!(declared = %kind, "declared type is informational for the API flow");
        }

        tracing::info!(url = %request_url, "requesting candidate list");
        let json = self.transport.fetch(request_url)?;
        tracing::debug!(body = %json, "request endpoint reply");

        tracing::info!("validating candidate list");
        let list = parse_candidates(&json)?;
        let total = list.clientes.len();

        let (payload, csv_path) = self.reconcile(list)?;
        let processed = payload.anvisa.len();

        let body = payload.to_json()?;
        tracing::info!(url = %send_url, processed, "sending reconciled payload");
        tracing::debug!(%body, "payload sent");
        let reply = self.transport.send(send_url, &body)?;
        tracing::debug!(body = %reply, "send endpoint reply");

        Ok(ApiSummary {
            total,
            processed,
            csv_path,
            reply,
        })
    }

    /// Look up the first `bound` candidates and build the return payload
    ///
    /// Returns the payload plus the CSV mirror path, already closed.
    pub fn reconcile(
        &self,
        list: CandidateList,
    ) -> Result<(ReconciliationReturn, Option<PathBuf>), ConsultaError> {
        let total = list.clientes.len();
        let bound = effective_bound(self.limit, total);
        tracing::info!(target: REPORT_TARGET, bound, "{} CNPJ to process", total);

        let strategy = create_strategy(StrategyKind::Cliente, self.lookup);
        let mut mirror = match &self.csv_dir {
            Some(dir) => Some(CsvMirror::create(dir, Local::now().naive_local())?),
            None => None,
        };

        let progress = Progress::new(bound as u64, self.show_progress);
        let mut anvisa = Vec::with_capacity(bound);
        for candidate in list.clientes.iter().take(bound) {
            let cnpj = Identifier::new(candidate.cnpj.clone());
            let record = strategy.process_identifier(&cnpj)?;

            if let Some(mirror) = mirror.as_mut() {
                mirror.append(&cnpj, &record, Local::now().naive_local())?;
            }

            anvisa.push(ReturnRow::from_record(candidate, &record)?);
            progress.advance();
        }
        progress.finish();

        let csv_path = mirror.map(CsvMirror::finish).transpose()?;
        Ok((ReconciliationReturn::new(list.extra, anvisa), csv_path))
    }
}

/// Number of candidates to process: the limit, capped by the list size
pub fn effective_bound(limit: Option<usize>, total: usize) -> usize {
    limit.map_or(total, |limit| limit.min(total))
}

/// Parse and validate the request endpoint body
pub fn parse_candidates(json: &str) -> Result<CandidateList, ConsultaError> {
    let value: Value = serde_json::from_str(json)?;
    validate_candidates(&value)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::test_support::capture_default_log;
    use crate::strategy::test_support::RecordingLookup;
    use crate::types::{AuthorizationGroup, RegulatoryRecord};
    use rstest::rstest;
    use serde_json::json;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Transport double serving a fixed candidate list and capturing the post
    struct FakeTransport {
        reply: String,
        sent: RefCell<Vec<(String, String)>>,
    }

    impl FakeTransport {
        fn serving(reply: Value) -> Self {
            FakeTransport {
                reply: reply.to_string(),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn sent_body(&self) -> Value {
            let sent = self.sent.borrow();
            serde_json::from_str(&sent[0].1).unwrap()
        }
    }

    impl ApiTransport for FakeTransport {
        fn fetch(&self, _url: &str) -> Result<String, ConsultaError> {
            Ok(self.reply.clone())
        }

        fn send(&self, url: &str, body: &str) -> Result<String, ConsultaError> {
            self.sent
                .borrow_mut()
                .push((url.to_string(), body.to_string()));
            Ok("ok".to_string())
        }
    }

    /// Lookup Service double answering every CNPJ with the same record
    struct FixedLookup(RegulatoryRecord);

    impl LookupService for FixedLookup {
        fn lookup_cliente(&self, _cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
            Ok(self.0.clone())
        }

        fn lookup_prospect(&self, _cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
            Ok(self.0.clone())
        }
    }

    fn five_candidates() -> Value {
        json!({
            "EMPRESA": "01",
            "CLIENTES": [
                {"FILIAL": "01", "CNPJ": "00000000000101"},
                {"FILIAL": "01", "CNPJ": "00000000000202"},
                {"FILIAL": "02", "CNPJ": "00000000000303"},
                {"FILIAL": "02", "CNPJ": "00000000000404"},
                {"FILIAL": "03", "CNPJ": "00000000000505"}
            ]
        })
    }

    #[rstest]
    #[case::no_limit(None, 5, 5)]
    #[case::below_total(Some(3), 5, 3)]
    #[case::above_total(Some(9), 5, 5)]
    #[case::empty_list(Some(3), 0, 0)]
    fn test_effective_bound(
        #[case] limit: Option<usize>,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(effective_bound(limit, total), expected);
    }

    #[test]
    fn test_single_candidate_round_trip() {
        let transport = FakeTransport::serving(json!({
            "CLIENTES": [{"FILIAL": "01", "CNPJ": "49150956000169"}]
        }));
        let lookup = RecordingLookup::default();

        let summary = ApiReconciliation::new(&transport, &lookup)
            .run("http://r", "http://s")
            .unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.reply, "ok");
        assert_eq!(transport.sent.borrow()[0].0, "http://s");

        let body = transport.sent_body();
        assert!(body.get("CLIENTES").is_none());
        assert_eq!(body["ANVISA"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["ANVISA"][0]["CNPJ"], json!("49150956000169"));
        assert_eq!(body["ANVISA"][0]["FIL"], json!("01"));
        assert_eq!(body["ANVISA"][0]["XDTACOR"], json!("20250131"));
        assert_eq!(body["ANVISA"][0]["XDTAMED"], json!(""));
    }

    #[test]
    fn test_limit_processes_leading_candidates_only() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::serving(five_candidates());
        let lookup = RecordingLookup::default();

        let summary = ApiReconciliation::new(&transport, &lookup)
            .with_limit(Some(3))
            .with_csv_mirror(Some(dir.path().to_path_buf()))
            .run("http://r", "http://s")
            .unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.processed, 3);

        let body = transport.sent_body();
        let cnpjs: Vec<&str> = body["ANVISA"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["CNPJ"].as_str().unwrap())
            .collect();
        assert_eq!(cnpjs, vec!["00000000000101", "00000000000202", "00000000000303"]);
        assert_eq!(body["EMPRESA"], json!("01"));

        let csv = fs::read_to_string(summary.csv_path.unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(!csv.contains("00000000000404"));
        assert!(!csv.contains("00000000000505"));
    }

    #[test]
    fn test_cnpj_is_not_padded_and_uses_cliente_lookup() {
        let transport = FakeTransport::serving(json!({
            "CLIENTES": [{"FILIAL": "01", "CNPJ": "49150956000169"}]
        }));
        let lookup = RecordingLookup::default();

        ApiReconciliation::new(&transport, &lookup)
            .with_declared_kind(Some(StrategyKind::Prospect))
            .run("http://r", "http://s")
            .unwrap();

        assert_eq!(
            lookup.calls.borrow().as_slice(),
            &[(StrategyKind::Cliente, "49150956000169".to_string())]
        );
    }

    #[test]
    fn test_schema_violation_aborts_before_lookup() {
        let transport = FakeTransport::serving(json!({
            "CLIENTES": [{"FILIAL": "01", "CNPJ": "4915095600016"}]
        }));
        let lookup = RecordingLookup::default();

        let result = ApiReconciliation::new(&transport, &lookup).run("http://r", "http://s");

        assert!(matches!(result, Err(ConsultaError::SchemaValidation { .. })));
        assert!(lookup.calls.borrow().is_empty());
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_non_json_reply_is_json_error() {
        let transport = FakeTransport {
            reply: "<html></html>".to_string(),
            sent: RefCell::new(Vec::new()),
        };
        let lookup = RecordingLookup::default();

        let result = ApiReconciliation::new(&transport, &lookup).run("http://r", "http://s");
        assert!(matches!(result, Err(ConsultaError::Json { .. })));
    }

    #[test]
    fn test_lookup_failure_sends_nothing() {
        let transport = FakeTransport::serving(five_candidates());
        let lookup = RecordingLookup::failing_on("00000000000202");

        let result = ApiReconciliation::new(&transport, &lookup).run("http://r", "http://s");

        assert!(matches!(result, Err(ConsultaError::LookupFailure { .. })));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_malformed_validade_aborts_before_send() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::serving(five_candidates());
        let lookup = FixedLookup(RegulatoryRecord {
            correlatos: AuthorizationGroup::new("Autorizado", "2025-01-31"),
            ..Default::default()
        });

        let result = ApiReconciliation::new(&transport, &lookup)
            .with_csv_mirror(Some(dir.path().to_path_buf()))
            .run("http://r", "http://s");

        assert_eq!(
            result,
            Err(ConsultaError::MalformedDate {
                value: "2025-01-31".to_string()
            })
        );
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_candidate_total_is_reported_at_default_verbosity() {
        let transport = FakeTransport::serving(five_candidates());
        let lookup = RecordingLookup::default();

        let (result, log) = capture_default_log(|| {
            ApiReconciliation::new(&transport, &lookup)
                .with_limit(Some(2))
                .run("http://r", "http://s")
        });

        assert!(result.is_ok());
        assert!(log.contains("5 CNPJ to process"), "log was: {}", log);
        assert!(!log.contains("requesting candidate list"));
    }
}
