//! # Binary RPC Backend
//!
//! A persistent TCP channel carrying length-prefixed CBOR frames.
//!
//! Request frame: `opcode (u8) | payload length (u32 BE) | CBOR payload`.
//! Response frame: `status (u16 BE) | payload length (u32 BE) | CBOR
//! payload` — the payload is the method's response object on status 200,
//! or an `ErrorDetails` body otherwise.
//!
//! Dialing is lazy (first RPC) and bounded by `connect_timeout`; each
//! request is bounded by `request_timeout` via socket read/write timeouts.
//! A timed-out request leaves the connection open and reusable; any other
//! I/O failure drops it so the next call re-dials.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::ApiError;

/// Payloads above this size indicate a corrupt frame, not a real response.
const MAX_FRAME_PAYLOAD: u32 = 64 * 1024 * 1024;

/// Binary RPC transport parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpTransport {
    /// `host:port` of the controller's binary RPC listener.
    pub location: String,
    /// Upper bound for one RPC round trip.
    pub request_timeout: Duration,
    /// Upper bound for establishing the connection.
    pub connect_timeout: Duration,
}

impl TcpTransport {
    /// Transport parameters with the default 10s timeouts.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// RPC method selector on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Opcode {
    SetConfig = 1,
    UpdateConfig = 2,
    GetConfig = 3,
    GetMetrics = 4,
    GetWarnings = 5,
    ClearWarnings = 6,
}

/// The binary backend: transport parameters plus the live connection, if
/// one has been dialed.
#[derive(Debug)]
pub(crate) struct TcpBackend {
    config: TcpTransport,
    stream: Option<TcpStream>,
}

impl TcpBackend {
    pub(crate) fn new(config: TcpTransport) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Drop the live connection. Safe to call repeatedly.
    pub(crate) fn close(&mut self) {
        self.stream = None;
    }

    fn dial(&self) -> Result<TcpStream, ApiError> {
        let addrs = self
            .config
            .location
            .to_socket_addrs()
            .map_err(|e| ApiError::Connection(format!("{}: {e}", self.config.location)))?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.config.connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.config.request_timeout))
                        .and_then(|()| {
                            stream.set_write_timeout(Some(self.config.request_timeout))
                        })
                        .map_err(|e| ApiError::Connection(e.to_string()))?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(match last_err {
            Some(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                ApiError::Timeout(format!("dial exceeded {:?}", self.config.connect_timeout))
            }
            Some(e) => ApiError::Connection(format!("{}: {e}", self.config.location)),
            None => ApiError::Connection(format!("{}: no addresses", self.config.location)),
        })
    }

    /// Send one request frame and read the response frame.
    pub(crate) fn call(&mut self, opcode: Opcode, payload: &[u8]) -> Result<(u16, Vec<u8>), ApiError> {
        if self.stream.is_none() {
            self.stream = Some(self.dial()?);
        }
        // Checked above.
        let stream = self.stream.as_mut().ok_or(ApiError::NoTransport)?;

        let result = Self::exchange(stream, opcode, payload, self.config.request_timeout);
        if matches!(result, Err(ApiError::Connection(_))) {
            // Broken channel; re-dial on the next call. Timeouts keep it.
            self.stream = None;
        }
        result
    }

    fn exchange(
        stream: &mut TcpStream,
        opcode: Opcode,
        payload: &[u8],
        request_timeout: Duration,
    ) -> Result<(u16, Vec<u8>), ApiError> {
        let map_io = |e: std::io::Error| match e.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                ApiError::Timeout(format!("request exceeded {request_timeout:?}"))
            }
            _ => ApiError::Connection(e.to_string()),
        };

        let mut frame = Vec::with_capacity(5 + payload.len());
        frame.push(opcode as u8);
        frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        frame.extend_from_slice(payload);
        stream.write_all(&frame).map_err(map_io)?;

        let mut header = [0u8; 6];
        stream.read_exact(&mut header).map_err(map_io)?;
        let status = u16::from_be_bytes([header[0], header[1]]);
        let len = u32::from_be_bytes([header[2], header[3], header[4], header[5]]);
        if len > MAX_FRAME_PAYLOAD {
            return Err(ApiError::Connection(format!(
                "response frame of {len} bytes exceeds the {MAX_FRAME_PAYLOAD} byte limit"
            )));
        }
        let mut body = vec![0u8; len as usize];
        stream.read_exact(&mut body).map_err(map_io)?;
        Ok((status, body))
    }
}
