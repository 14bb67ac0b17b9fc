//! # Telemetry Request/Response Objects
//!
//! The metrics side of the RPC surface: a choice-shaped request selecting
//! port or flow counters, and the matching response rows.

use serde::{Deserialize, Serialize};

use crate::codec::Validated;
use crate::validate::{Validate, ValidationContext, ValidationError};

/// Variants of [`MetricsRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsRequestChoice {
    /// Per-port counters.
    #[default]
    Port,
    /// Per-flow counters.
    Flow,
}

impl std::fmt::Display for MetricsRequestChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Port => "PORT",
            Self::Flow => "FLOW",
        };
        f.write_str(s)
    }
}

/// Request for a metrics snapshot: exactly one of port or flow scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice: Option<MetricsRequestChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<PortMetricsRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flow: Option<FlowMetricsRequest>,
}

impl MetricsRequest {
    /// An empty request; scope defaults to `port`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active scope; the declared default (`port`) before any accessor
    /// has run.
    pub fn choice(&self) -> MetricsRequestChoice {
        self.choice.unwrap_or_default()
    }

    /// Select port scope, materializing the sub-request if absent.
    pub fn port(&mut self) -> &mut PortMetricsRequest {
        self.choice = Some(MetricsRequestChoice::Port);
        self.port.get_or_insert_with(PortMetricsRequest::default)
    }

    /// Select flow scope, materializing the sub-request if absent.
    pub fn flow(&mut self) -> &mut FlowMetricsRequest {
        self.choice = Some(MetricsRequestChoice::Flow);
        self.flow.get_or_insert_with(FlowMetricsRequest::default)
    }
}

impl Validate for MetricsRequest {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

impl Validated for MetricsRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let (result, _) = crate::validate::validate(self, "metrics_request");
        result
    }
}

/// Port-scope filter: empty means all ports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortMetricsRequest {
    /// Names of ports to report on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_names: Vec<String>,
}

/// Flow-scope filter: empty means all flows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowMetricsRequest {
    /// Names of flows to report on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flow_names: Vec<String>,
}

/// A metrics snapshot, mirroring the request's scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsResponse {
    /// Which scope the rows belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<MetricsRequestChoice>,
    /// Per-port rows when the scope is `port`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_metrics: Vec<PortMetric>,
    /// Per-flow rows when the scope is `flow`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flow_metrics: Vec<FlowMetric>,
}

impl Validate for MetricsResponse {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

impl Validated for MetricsResponse {
    fn validate(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// One port's counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortMetric {
    /// Port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Frames transmitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_tx: Option<u64>,
    /// Frames received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_rx: Option<u64>,
    /// Bytes transmitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_tx: Option<u64>,
    /// Bytes received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_rx: Option<u64>,
}

/// One flow's counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowMetric {
    /// Flow name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Frames transmitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_tx: Option<u64>,
    /// Frames received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_rx: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireObject;

    #[test]
    fn default_scope_is_port() {
        let req = MetricsRequest::new();
        assert_eq!(req.choice(), MetricsRequestChoice::Port);
    }

    #[test]
    fn selecting_flow_scope_moves_choice() {
        let mut req = MetricsRequest::new();
        req.flow().flow_names.push("f1".to_string());
        assert_eq!(req.choice(), MetricsRequestChoice::Flow);

        let json = req.to_json().unwrap();
        let mut back = MetricsRequest::new();
        back.from_json(&json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn response_round_trips_through_binary() {
        let mut resp = MetricsResponse {
            choice: Some(MetricsRequestChoice::Port),
            port_metrics: vec![PortMetric {
                name: Some("p1".to_string()),
                frames_tx: Some(100),
                frames_rx: Some(99),
                bytes_tx: Some(6400),
                bytes_rx: Some(6336),
            }],
            flow_metrics: Vec::new(),
        };
        let bytes = resp.to_binary().unwrap();
        let mut back = MetricsResponse::default();
        back.from_binary(&bytes).unwrap();
        assert_eq!(back, resp);
    }
}
