//! # Transport Error Taxonomy
//!
//! Transport-level failures (connection refused, timeout) are distinguished
//! from application-level error responses: the former surface before any
//! status code is known, the latter always carry the server's structured
//! error body.

use thiserror::Error;

use flowcfg_model::{CodecError, ErrorDetails, ValidationError};

/// Error from an RPC call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No transport has been selected on this API instance.
    #[error("no transport configured")]
    NoTransport,

    /// The connection could not be established or broke mid-call.
    #[error("connection error: {0}")]
    Connection(String),

    /// The call did not complete within the configured request timeout.
    /// For the binary backend the connection remains reusable.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request object failed validation before encoding.
    #[error("validation failed:\n{0}")]
    Validation(#[from] ValidationError),

    /// The request could not be encoded or the response payload could not
    /// be decoded.
    #[error(transparent)]
    Codec(CodecError),

    /// The server answered with a 4xx/5xx status and a structured error
    /// body.
    #[error("api error: {0}")]
    Response(ErrorDetails),
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        // Validation surfacing through the marshal path keeps its own class.
        match err {
            CodecError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Codec(other),
        }
    }
}
