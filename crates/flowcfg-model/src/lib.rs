//! # flowcfg-model — Typed Object Model and Runtime Engine
//!
//! The shared runtime every generated object relies on: the configuration
//! object tree, the choice (tagged-union) state machine, the tree-walking
//! validation engine, and the four-format serialization facade.
//!
//! ## Key Design Principles
//!
//! 1. **Per-call validation state.** A [`ValidationContext`] is created per
//!    validate/serialize call and discarded afterwards; there are no
//!    process-global error buffers, so independent trees validate
//!    independently.
//!
//! 2. **Concrete composites, tagged choices.** Nested objects are plain
//!    structs owned by value; only oneof-shaped fields carry a runtime
//!    discriminator. No broad interface types, no dynamic dispatch.
//!
//! 3. **One logical value, four encodings.** JSON, YAML, debug text and
//!    CBOR all encode the identical object graph; decode replaces node
//!    state wholesale and never merges.
//!
//! ## Thread Safety
//!
//! A tree is single-threaded per call: validation mutates the root's
//! warning store in place. Use independent trees per thread or serialize
//! access externally.

pub mod codec;
pub mod config;
pub mod metrics;
pub mod response;
pub mod validate;

pub use codec::{CodecError, Validated, WireObject};
pub use config::{
    Config, ConfigOptions, Device, DeviceIpv4, Ethernet, FixedPackets, Flow, FlowDuration,
    FlowDurationChoice, FlowRate, FlowRateChoice,
};
pub use metrics::{
    FlowMetric, FlowMetricsRequest, MetricsRequest, MetricsRequestChoice, MetricsResponse,
    PortMetric, PortMetricsRequest,
};
pub use response::{Ack, ErrorDetails, WarningDetails};
pub use validate::{Validate, ValidationContext, ValidationError};
