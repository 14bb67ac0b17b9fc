//! # HTTP+JSON Backend
//!
//! The REST rendition of the RPC surface: `POST /config`, `PATCH /config`,
//! `GET /config`, `POST /metrics`, `GET /warnings`, `DELETE /warnings`.
//! Success is a 200 with a JSON payload; anything else carries a JSON
//! `ErrorDetails` body with the matching status.

use reqwest::blocking::Client;
use reqwest::Method;

use crate::error::ApiError;

/// HTTP transport parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransport {
    /// Base URL of the controller, e.g. `https://10.0.0.1:8443`. A bare
    /// `host:port` is taken as `http://host:port`.
    pub location: String,
    /// Whether to verify the server's TLS certificate. Test controllers
    /// commonly run with self-signed certificates, so the default is off.
    pub verify_tls: bool,
}

impl HttpTransport {
    /// Transport parameters with TLS verification disabled.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            verify_tls: false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct HttpBackend {
    base: String,
    client: Client,
}

impl HttpBackend {
    pub(crate) fn new(config: HttpTransport) -> Result<Self, ApiError> {
        let base = if config.location.contains("://") {
            config.location.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", config.location.trim_end_matches('/'))
        };
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(Self { base, client })
    }

    /// Issue one request and hand back `(status, body)`. Transport-level
    /// failures are classified before any status code exists.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        json_body: Option<String>,
    ) -> Result<(u16, String), ApiError> {
        let url = format!("{}{path}", self.base);
        let mut request = self.client.request(method, &url);
        if let Some(body) = json_body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }
        let response = request.send().map_err(map_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest)?;
        Ok((status, body))
    }
}

fn map_reqwest(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(err.to_string())
    } else {
        ApiError::Connection(err.to_string())
    }
}
