//! API payload shapes
//!
//! The request endpoint returns a [`CandidateList`]; after reconciliation the
//! same top-level object travels back as a [`ReconciliationReturn`], with
//! `CLIENTES` replaced by an index-aligned `ANVISA` array.

use crate::types::{ConsultaError, RegulatoryRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Date layout produced by the Lookup Service
const VALIDADE_FORMAT: &str = "%d/%m/%Y";

/// Date layout expected by the return endpoint
const RETURN_DATE_FORMAT: &str = "%Y%m%d";

/// Key under which reconciled rows are returned
pub const ANVISA_KEY: &str = "ANVISA";

/// One candidate company from the request endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Branch code, echoed back as `FIL`
    #[serde(rename = "FILIAL")]
    pub filial: String,

    /// Unmasked 14-digit CNPJ
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
}

/// Validated inbound payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandidateList {
    #[serde(rename = "CLIENTES")]
    pub clientes: Vec<Candidate>,

    /// Every other top-level field, forwarded untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outbound payload posted to the send endpoint
///
/// Serializes the forwarded fields in their inbound order, then `ANVISA`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReturn {
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(rename = "ANVISA")]
    pub anvisa: Vec<ReturnRow>,
}

impl ReconciliationReturn {
    /// Build the outbound payload from the inbound extras and the reconciled rows
    ///
    /// `CLIENTES` is not part of [`CandidateList::extra`], so it is dropped
    /// here; a pre-existing `ANVISA` field is replaced by the new rows.
    pub fn new(mut extra: Map<String, Value>, anvisa: Vec<ReturnRow>) -> Self {
        extra.shift_remove(ANVISA_KEY);
        ReconciliationReturn { extra, anvisa }
    }

    /// Serialize to the JSON body sent to the return endpoint
    pub fn to_json(&self) -> Result<String, ConsultaError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Per-candidate row of the `ANVISA` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ReturnRow {
    pub fil: String,
    pub cnpj: String,
    pub xanvcor: String,
    pub xdtacor: String,
    pub xanvmed: String,
    pub xdtamed: String,
    pub xanvsan: String,
    pub xdtasan: String,
}

impl ReturnRow {
    /// Derive the return row for a candidate from its regulatory record
    ///
    /// # Errors
    ///
    /// Returns `MalformedDate` if any non-empty validity date is not `dd/mm/yyyy`.
    pub fn from_record(
        candidate: &Candidate,
        record: &RegulatoryRecord,
    ) -> Result<Self, ConsultaError> {
        Ok(ReturnRow {
            fil: candidate.filial.clone(),
            cnpj: candidate.cnpj.clone(),
            xanvcor: record.correlatos.autorizacao.clone(),
            xdtacor: reformat_validade(&record.correlatos.validade)?,
            xanvmed: record.medicamentos.autorizacao.clone(),
            xdtamed: reformat_validade(&record.medicamentos.validade)?,
            xanvsan: record.saneantes.autorizacao.clone(),
            xdtasan: reformat_validade(&record.saneantes.validade)?,
        })
    }
}

/// Convert `dd/mm/yyyy` into `yyyymmdd`; an empty date stays empty
pub fn reformat_validade(validade: &str) -> Result<String, ConsultaError> {
    if validade.is_empty() {
        return Ok(String::new());
    }

    NaiveDate::parse_from_str(validade, VALIDADE_FORMAT)
        .map(|date| date.format(RETURN_DATE_FORMAT).to_string())
        .map_err(|_| ConsultaError::malformed_date(validade))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorizationGroup;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::regular("31/01/2025", "20250131")]
    #[case::empty("", "")]
    #[case::leap_day("29/02/2024", "20240229")]
    fn test_reformat_validade(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(reformat_validade(input).unwrap(), expected);
    }

    #[rstest]
    #[case::iso("2025-01-31")]
    #[case::month_first("01/31/2025")]
    #[case::text("sem validade")]
    fn test_reformat_validade_rejects_malformed(#[case] input: &str) {
        assert_eq!(
            reformat_validade(input),
            Err(ConsultaError::MalformedDate {
                value: input.to_string()
            })
        );
    }

    #[test]
    fn test_return_row_from_record() {
        let candidate = Candidate {
            filial: "01".to_string(),
            cnpj: "49150956000169".to_string(),
        };
        let record = RegulatoryRecord {
            correlatos: AuthorizationGroup::new("Autorizado", "31/01/2025"),
            medicamentos: AuthorizationGroup::new("Não autorizado", ""),
            saneantes: AuthorizationGroup::new("Autorizado", "15/06/2027"),
            status: None,
        };

        let row = ReturnRow::from_record(&candidate, &record).unwrap();
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({
                "FIL": "01",
                "CNPJ": "49150956000169",
                "XANVCOR": "Autorizado",
                "XDTACOR": "20250131",
                "XANVMED": "Não autorizado",
                "XDTAMED": "",
                "XANVSAN": "Autorizado",
                "XDTASAN": "20270615"
            })
        );
    }

    #[test]
    fn test_candidate_list_keeps_extra_fields() {
        let list: CandidateList = serde_json::from_value(json!({
            "CLIENTES": [{"FILIAL": "01", "CNPJ": "49150956000169"}],
            "EMPRESA": "99",
            "ANVISA": []
        }))
        .unwrap();

        assert_eq!(list.clientes.len(), 1);
        assert_eq!(list.extra.get("EMPRESA"), Some(&json!("99")));
        assert!(!list.extra.contains_key("CLIENTES"));
    }

    #[test]
    fn test_return_payload_replaces_clientes_with_anvisa() {
        let mut extra = Map::new();
        extra.insert("EMPRESA".to_string(), json!("99"));
        extra.insert("ANVISA".to_string(), json!("stale"));
        extra.insert("URL".to_string(), json!("http://host/path"));

        let payload = ReconciliationReturn::new(extra, vec![ReturnRow::default()]);
        let body = payload.to_json().unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();

        assert!(value.get("CLIENTES").is_none());
        assert_eq!(value["ANVISA"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["EMPRESA"], json!("99"));
        assert!(body.contains("http://host/path"), "slashes must not be escaped");
    }

    #[test]
    fn test_return_payload_keeps_inbound_key_order() {
        let list: CandidateList = serde_json::from_str(
            r#"{"ZONA":"sul","CLIENTES":[],"EMPRESA":"99","ANVISA":"stale","DATA":"20250101"}"#,
        )
        .unwrap();

        let body = ReconciliationReturn::new(list.extra, Vec::new())
            .to_json()
            .unwrap();

        assert_eq!(
            body,
            r#"{"ZONA":"sul","EMPRESA":"99","DATA":"20250101","ANVISA":[]}"#
        );
    }
}
