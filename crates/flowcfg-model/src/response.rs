//! # Control-Plane Response Objects
//!
//! Acknowledgements, warning reports, and the structured error body every
//! non-2xx response carries regardless of transport backend.

use serde::{Deserialize, Serialize};

use crate::codec::Validated;
use crate::validate::{Validate, ValidationContext, ValidationError};

/// Successful acknowledgement of a state-changing RPC. May carry
/// non-fatal warnings produced while applying the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ack {
    /// Non-fatal messages produced while applying the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Validate for Ack {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

impl Validated for Ack {
    fn validate(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Warnings accumulated server-side since the last clear.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarningDetails {
    /// Accumulated warning messages, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Validate for WarningDetails {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

impl Validated for WarningDetails {
    fn validate(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// The structured error body of a 4xx/5xx response: a numeric code plus
/// human-readable messages. Both backends produce this same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDetails {
    /// Numeric status code (HTTP status or its RPC equivalent).
    #[serde(default)]
    pub code: u32,
    /// Human-readable error messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}: {}", self.code, self.errors.join("; "))
    }
}

impl Validate for ErrorDetails {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

impl Validated for ErrorDetails {
    fn validate(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireObject;

    #[test]
    fn error_details_display_joins_messages() {
        let details = ErrorDetails {
            code: 400,
            errors: vec!["bad config".to_string(), "missing name".to_string()],
        };
        assert_eq!(details.to_string(), "status 400: bad config; missing name");
    }

    #[test]
    fn ack_round_trips() {
        let mut ack = Ack {
            warnings: vec!["port p1 is oversubscribed".to_string()],
        };
        let json = ack.to_json().unwrap();
        let mut back = Ack::default();
        back.from_json(&json).unwrap();
        assert_eq!(back, ack);
    }
}
