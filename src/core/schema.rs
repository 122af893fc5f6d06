//! Inbound payload schema
//!
//! The request endpoint is untrusted. Its JSON must be an object with a
//! `CLIENTES` array whose items carry a string `FILIAL` and an unmasked
//! 14-digit `CNPJ`. Validation runs before anything is processed.

use crate::types::ConsultaError;
use serde_json::{json, Value};

/// JSON schema enforced on the request endpoint payload
pub fn candidate_schema() -> Value {
    json!({
        "type": "object",
        "title": "Candidate list returned by the request endpoint",
        "required": ["CLIENTES"],
        "properties": {
            "CLIENTES": {
                "type": "array",
                "title": "Client list",
                "items": {
                    "type": "object",
                    "title": "Client",
                    "required": ["FILIAL", "CNPJ"],
                    "properties": {
                        "FILIAL": {
                            "type": "string",
                            "title": "Branch, echoed back as FIL",
                            "default": ""
                        },
                        "CNPJ": {
                            "type": "string",
                            "title": "Unmasked CNPJ",
                            "default": "",
                            "examples": ["49150956000169"],
                            "pattern": "^(\\d{14})$"
                        }
                    }
                }
            }
        }
    })
}

/// Validate an inbound payload against [`candidate_schema`]
///
/// # Errors
///
/// Returns `SchemaValidation` listing every violation with its instance path.
pub fn validate_candidates(payload: &Value) -> Result<(), ConsultaError> {
    let validator = jsonschema::validator_for(&candidate_schema()).map_err(|e| {
        ConsultaError::SchemaValidation {
            errors: vec![format!("invalid schema: {}", e)],
        }
    })?;

    let errors: Vec<String> = validator
        .iter_errors(payload)
        .map(|e| format!("{}: {}", e.instance_path, e))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConsultaError::SchemaValidation { errors })
    }
}
