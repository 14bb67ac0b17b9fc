//! # flowcfg-transport — Backend-Independent RPC Client
//!
//! Issues the same logical RPCs (set/update/get configuration, metrics,
//! warnings) over either a framed binary CBOR channel or HTTP+JSON, and
//! unifies the status-coded response variants into one success/error
//! contract.
//!
//! ## Backend Selection
//!
//! An [`Api`] instance holds at most one active transport. Selecting one
//! tears down the other, including closing any live connection. RPCs on an
//! instance with no transport fail with [`ApiError::NoTransport`].
//!
//! ## Error Contract
//!
//! A connection-level failure surfaces as [`ApiError::Connection`] or
//! [`ApiError::Timeout`] before any status code is known. A 4xx/5xx answer
//! always surfaces as [`ApiError::Response`] carrying the server's
//! structured [`ErrorDetails`] body. Calls block until response or
//! timeout; retries are a caller concern.

mod error;
mod http;
mod tcp;

use reqwest::Method;
use tracing::debug;

use flowcfg_model::{
    Ack, Config, ErrorDetails, MetricsRequest, MetricsResponse, WarningDetails, WireObject,
};

pub use error::ApiError;
pub use http::HttpTransport;
pub use tcp::TcpTransport;

use http::HttpBackend;
use tcp::{Opcode, TcpBackend};

/// Which transport an [`Api`] instance should use. Exactly one is active
/// at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Framed binary CBOR over a persistent TCP connection.
    Tcp(TcpTransport),
    /// HTTP+JSON against the controller's REST surface.
    Http(HttpTransport),
}

#[derive(Debug)]
enum Backend {
    Tcp(TcpBackend),
    Http(HttpBackend),
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Tcp(_) => "tcp",
            Backend::Http(_) => "http",
        }
    }
}

/// The client-side RPC surface exposed to generated API objects.
#[derive(Debug, Default)]
pub struct Api {
    backend: Option<Backend>,
}

impl Api {
    /// An API instance with no transport selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a transport, tearing down the previous one.
    pub fn set_transport(&mut self, config: TransportConfig) -> Result<(), ApiError> {
        match config {
            TransportConfig::Tcp(tcp) => {
                self.set_tcp_transport(tcp);
                Ok(())
            }
            TransportConfig::Http(http) => self.set_http_transport(http),
        }
    }

    /// Select the binary backend, tearing down any previous transport.
    /// Dialing is lazy; the first RPC connects.
    pub fn set_tcp_transport(&mut self, config: TcpTransport) {
        self.close();
        self.backend = Some(Backend::Tcp(TcpBackend::new(config)));
    }

    /// Select the HTTP backend, tearing down any previous transport.
    pub fn set_http_transport(&mut self, config: HttpTransport) -> Result<(), ApiError> {
        self.close();
        self.backend = Some(Backend::Http(HttpBackend::new(config)?));
        Ok(())
    }

    /// Tear down any live connection. The selected transport stays
    /// configured and re-dials on the next RPC. Idempotent.
    pub fn close(&mut self) {
        if let Some(Backend::Tcp(tcp)) = self.backend.as_mut() {
            tcp.close();
        }
    }

    /// Push a full configuration to the controller.
    ///
    /// The configuration is validated before encoding; validation failures
    /// surface as the call's error without touching the wire.
    pub fn set_config(&mut self, config: &mut Config) -> Result<Ack, ApiError> {
        self.call(
            "set_config",
            Opcode::SetConfig,
            Method::POST,
            "/config",
            Some(config),
            true,
        )
    }

    /// Apply a partial configuration and receive the controller's merged
    /// view. The partial is encoded directly, without full-tree validation.
    pub fn update_configuration(&mut self, config: &mut Config) -> Result<Config, ApiError> {
        self.call(
            "update_configuration",
            Opcode::UpdateConfig,
            Method::PATCH,
            "/config",
            Some(config),
            false,
        )
    }

    /// Fetch the controller's current configuration.
    pub fn get_config(&mut self) -> Result<Config, ApiError> {
        self.call(
            "get_config",
            Opcode::GetConfig,
            Method::GET,
            "/config",
            None::<&mut Config>,
            false,
        )
    }

    /// Fetch a metrics snapshot for the requested scope.
    pub fn get_metrics(&mut self, request: &mut MetricsRequest) -> Result<MetricsResponse, ApiError> {
        self.call(
            "get_metrics",
            Opcode::GetMetrics,
            Method::POST,
            "/metrics",
            Some(request),
            true,
        )
    }

    /// Fetch the warnings accumulated server-side since the last clear.
    pub fn get_warnings(&mut self) -> Result<WarningDetails, ApiError> {
        self.call(
            "get_warnings",
            Opcode::GetWarnings,
            Method::GET,
            "/warnings",
            None::<&mut Config>,
            false,
        )
    }

    /// Clear the server-side warning store.
    pub fn clear_warnings(&mut self) -> Result<Ack, ApiError> {
        self.call(
            "clear_warnings",
            Opcode::ClearWarnings,
            Method::DELETE,
            "/warnings",
            None::<&mut Config>,
            false,
        )
    }

    /// One RPC round trip: encode the request in the backend's wire format,
    /// exchange, and map the status-coded response onto the unified
    /// success/error contract.
    fn call<Req, Resp>(
        &mut self,
        rpc: &'static str,
        opcode: Opcode,
        method: Method,
        path: &'static str,
        request: Option<&mut Req>,
        validate: bool,
    ) -> Result<Resp, ApiError>
    where
        Req: WireObject,
        Resp: WireObject + Default,
    {
        let backend = self.backend.as_mut().ok_or(ApiError::NoTransport)?;
        debug!(rpc, backend = backend.name(), "issuing rpc");
        match backend {
            Backend::Http(http) => {
                let body = match request {
                    Some(r) if validate => Some(r.to_json()?),
                    Some(r) => Some(r.encode_json()?),
                    None => None,
                };
                let (status, text) = http.request(method, path, body)?;
                debug!(rpc, backend = "http", status, "rpc complete");
                if status == 200 {
                    let mut value = Resp::default();
                    value.from_json(&text)?;
                    Ok(value)
                } else {
                    Err(http_failure(status, &text))
                }
            }
            Backend::Tcp(tcp) => {
                let payload = match request {
                    Some(r) if validate => r.to_binary()?,
                    Some(r) => r.encode_binary()?,
                    None => Vec::new(),
                };
                let (status, bytes) = tcp.call(opcode, &payload)?;
                debug!(rpc, backend = "tcp", status, "rpc complete");
                if status == 200 {
                    let mut value = Resp::default();
                    value.from_binary(&bytes)?;
                    Ok(value)
                } else {
                    Err(tcp_failure(status, &bytes))
                }
            }
        }
    }
}

/// Map a non-200 HTTP answer onto the structured error contract. A body
/// that is not a well-formed `ErrorDetails` is wrapped verbatim.
fn http_failure(status: u16, body: &str) -> ApiError {
    let details = serde_json::from_str::<ErrorDetails>(body).unwrap_or_else(|_| ErrorDetails {
        code: u32::from(status),
        errors: vec![body.to_string()],
    });
    ApiError::Response(details)
}

/// Map a non-200 binary answer onto the structured error contract.
fn tcp_failure(status: u16, payload: &[u8]) -> ApiError {
    let details =
        ciborium::de::from_reader::<ErrorDetails, _>(payload).unwrap_or_else(|_| ErrorDetails {
            code: u32::from(status),
            errors: vec!["undecodable error body".to_string()],
        });
    ApiError::Response(details)
}
