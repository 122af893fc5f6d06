//! Regulatory status records returned by the Lookup Service

use serde::{Deserialize, Serialize};

/// Authorization status of one product group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGroup {
    /// Free-text authorization status
    #[serde(default)]
    pub autorizacao: String,

    /// Validity date as `dd/mm/yyyy`, or empty when there is none
    #[serde(default)]
    pub validade: String,
}

impl AuthorizationGroup {
    pub fn new(autorizacao: impl Into<String>, validade: impl Into<String>) -> Self {
        AuthorizationGroup {
            autorizacao: autorizacao.into(),
            validade: validade.into(),
        }
    }
}

/// Regulatory status of one company
///
/// Produced once per identifier and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryRecord {
    /// Medical devices ("correlatos")
    #[serde(default)]
    pub correlatos: AuthorizationGroup,

    /// Medicines
    #[serde(default)]
    pub medicamentos: AuthorizationGroup,

    /// Sanitizing products
    #[serde(default)]
    pub saneantes: AuthorizationGroup,

    /// Optional free-text status reported by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RegulatoryRecord {
    /// Human-readable summary written into the spreadsheet `Status` column
    ///
    /// A registry-reported status wins; otherwise the three groups are
    /// listed with their validity dates.
    pub fn status_line(&self) -> String {
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            return status.to_string();
        }

        [
            ("Correlatos", &self.correlatos),
            ("Medicamentos", &self.medicamentos),
            ("Saneantes", &self.saneantes),
        ]
        .iter()
        .map(|(label, group)| {
            if group.validade.is_empty() {
                format!("{}: {}", label, group.autorizacao)
            } else {
                format!("{}: {} ({})", label, group.autorizacao, group.validade)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_prefers_registry_status() {
        let record = RegulatoryRecord {
            status: Some("CNPJ não encontrado".to_string()),
            ..Default::default()
        };
        assert_eq!(record.status_line(), "CNPJ não encontrado");
    }

    #[test]
    fn test_status_line_summarizes_groups() {
        let record = RegulatoryRecord {
            correlatos: AuthorizationGroup::new("Autorizado", "31/01/2025"),
            medicamentos: AuthorizationGroup::new("Não autorizado", ""),
            saneantes: AuthorizationGroup::new("Autorizado", "01/12/2026"),
            status: Some("  ".to_string()),
        };
        assert_eq!(
            record.status_line(),
            "Correlatos: Autorizado (31/01/2025); Medicamentos: Não autorizado; Saneantes: Autorizado (01/12/2026)"
        );
    }

    #[test]
    fn test_deserialize_without_status() {
        let json = r#"{
            "correlatos": {"autorizacao": "Autorizado", "validade": "31/01/2025"},
            "medicamentos": {"autorizacao": "", "validade": ""},
            "saneantes": {"autorizacao": "Autorizado", "validade": ""}
        }"#;
        let record: RegulatoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.correlatos.validade, "31/01/2025");
        assert_eq!(record.status, None);
    }
}
