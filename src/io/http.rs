//! Blocking HTTP clients
//!
//! - [`UreqTransport`] fetches the candidate list and posts the reconciled
//!   payload for the API flow.
//! - [`HttpLookupService`] queries a registry lookup endpoint that answers
//!   with a JSON [`RegulatoryRecord`].
//!
//! No timeouts or retries are configured: a failed call aborts the run.

use crate::core::traits::{ApiTransport, LookupService};
use crate::types::{ConsultaError, Identifier, RegulatoryRecord};
use ureq::Agent;

/// Content type sent with the reconciled payload
///
/// The body is JSON text; the receiving endpoint has always been called with
/// this form content type and its tolerance for `application/json` is unknown.
pub const SEND_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// [`ApiTransport`] backed by a `ureq` agent
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        UreqTransport {
            agent: Agent::new_with_defaults(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTransport for UreqTransport {
    fn fetch(&self, url: &str) -> Result<String, ConsultaError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| ConsultaError::network(url, e.to_string()))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| ConsultaError::network(url, e.to_string()))
    }

    fn send(&self, url: &str, body: &str) -> Result<String, ConsultaError> {
        let mut response = self
            .agent
            .post(url)
            .header("Content-type", SEND_CONTENT_TYPE)
            .send(body)
            .map_err(|e| ConsultaError::network(url, e.to_string()))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| ConsultaError::network(url, e.to_string()))
    }
}

/// [`LookupService`] that GETs `<base>/<kind>/<cnpj>` and decodes the JSON record
#[derive(Clone)]
pub struct HttpLookupService {
    agent: Agent,
    base_url: String,
}

impl HttpLookupService {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpLookupService {
            agent: Agent::new_with_defaults(),
            base_url: base_url.into(),
        }
    }

    fn lookup(&self, kind: &str, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
        let url = format!("{}/{}/{}", self.base_url.trim_end_matches('/'), kind, cnpj);
        tracing::debug!(%url, "querying registry");

        let mut response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| ConsultaError::lookup_failure(cnpj.as_str(), e.to_string()))?;

        response
            .body_mut()
            .read_json::<RegulatoryRecord>()
            .map_err(|e| ConsultaError::lookup_failure(cnpj.as_str(), e.to_string()))
    }
}

impl LookupService for HttpLookupService {
    fn lookup_cliente(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
        self.lookup("cliente", cnpj)
    }

    fn lookup_prospect(&self, cnpj: &Identifier) -> Result<RegulatoryRecord, ConsultaError> {
        self.lookup("prospect", cnpj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve a single request on a loopback port and hand back the raw request
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback");
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Failed to accept");
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();
            head.push_str(&String::from_utf8(request_body).unwrap());

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            head
        });

        (url, handle)
    }

    #[test]
    fn test_fetch_returns_body() {
        let (url, server) = serve_once("200 OK", r#"{"CLIENTES":[]}"#);
        let body = UreqTransport::new().fetch(&format!("{}/clientes", url)).unwrap();
        let request = server.join().unwrap();

        assert_eq!(body, r#"{"CLIENTES":[]}"#);
        assert!(request.starts_with("GET /clientes"));
    }

    #[test]
    fn test_send_posts_json_with_form_content_type() {
        let (url, server) = serve_once("200 OK", "ok");
        let reply = UreqTransport::new()
            .send(&format!("{}/retorno", url), r#"{"ANVISA":[]}"#)
            .unwrap();
        let request = server.join().unwrap();

        assert_eq!(reply, "ok");
        assert!(request.starts_with("POST /retorno"));
        assert!(request
            .to_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with(r#"{"ANVISA":[]}"#));
    }

    #[test]
    fn test_fetch_error_status_is_network_error() {
        let (url, server) = serve_once("500 Internal Server Error", "boom");
        let result = UreqTransport::new().fetch(&url);
        server.join().unwrap();

        assert!(matches!(result, Err(ConsultaError::Network { .. })));
    }

    #[test]
    fn test_lookup_decodes_record() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"correlatos":{"autorizacao":"Autorizado","validade":"31/01/2025"},"medicamentos":{"autorizacao":"","validade":""},"saneantes":{"autorizacao":"","validade":""}}"#,
        );
        let record = HttpLookupService::new(format!("{}/", url))
            .lookup_prospect(&Identifier::new("49150956000169"))
            .unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("GET /prospect/49150956000169"));
        assert_eq!(record.correlatos.autorizacao, "Autorizado");
    }

    #[test]
    fn test_lookup_bad_payload_is_lookup_failure() {
        let (url, server) = serve_once("200 OK", "<html>captcha</html>");
        let result =
            HttpLookupService::new(url).lookup_cliente(&Identifier::new("49150956000169"));
        server.join().unwrap();

        assert!(matches!(
            result,
            Err(ConsultaError::LookupFailure { ref cnpj, .. }) if cnpj == "49150956000169"
        ));
    }
}
