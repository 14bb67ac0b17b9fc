//! # Configuration Object Tree
//!
//! The typed objects application code builds and exchanges with the
//! controller: a [`Config`] root owning devices and flows, with pattern
//! fields for address generation and choice fields for oneof-shaped
//! schema members.
//!
//! Accessors follow the generated-SDK convention: child accessors on
//! `&mut self` lazily create the child (and, for choice fields, move the
//! discriminator), so they are not side-effect-free. Choice accessors do
//! not clear sibling variants' data — switching back to a previously used
//! variant restores its last values.

use serde::{Deserialize, Serialize};

use flowcfg_core::format;
use flowcfg_pattern::{IntegerPattern, Ipv4Pattern, MacPattern};

use crate::codec::Validated;
use crate::validate::{Validate, ValidationContext, ValidationError};

// ─── Config (root) ───────────────────────────────────────────────────

/// Root of the configuration tree.
///
/// Holds the one-shot warning store for the whole tree: warnings are
/// rebuilt on every validation/serialization pass and drained on read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Emulated devices. Names are unique within one configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    devices: Vec<Device>,
    /// Traffic flows. Names are unique within one configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flows: Vec<Flow>,
    /// Global knobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<ConfigOptions>,
    #[serde(skip)]
    warnings: Vec<String>,
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default device and return it for population.
    pub fn add_device(&mut self) -> &mut Device {
        self.devices.push(Device::default());
        // Just pushed, so the list is non-empty.
        self.devices.last_mut().unwrap_or_else(|| unreachable!())
    }

    /// Append a default flow and return it for population.
    pub fn add_flow(&mut self) -> &mut Flow {
        self.flows.push(Flow::default());
        self.flows.last_mut().unwrap_or_else(|| unreachable!())
    }

    /// The devices in declaration order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Mutable access to the devices.
    pub fn devices_mut(&mut self) -> &mut Vec<Device> {
        &mut self.devices
    }

    /// The flows in declaration order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Mutable access to the flows.
    pub fn flows_mut(&mut self) -> &mut Vec<Flow> {
        &mut self.flows
    }

    /// Global options, created on first access.
    pub fn options(&mut self) -> &mut ConfigOptions {
        self.options.get_or_insert_with(ConfigOptions::default)
    }

    /// Drain the warnings collected by the most recent validation or
    /// serialization pass. Reading is one-shot; a later pass rebuilds the
    /// list from scratch, so repeated passes do not accumulate.
    pub fn warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

impl Validate for Config {
    fn check(&self, ctx: &mut ValidationContext, path: &str) {
        for (i, device) in self.devices.iter().enumerate() {
            device.check(ctx, &format!("{path}.devices[{i}]"));
        }
        for (i, flow) in self.flows.iter().enumerate() {
            flow.check(ctx, &format!("{path}.flows[{i}]"));
        }
        if let Some(options) = &self.options {
            options.check(ctx, &format!("{path}.options"));
        }
    }
}

impl Validated for Config {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut ctx = ValidationContext::new(true);
        self.check(&mut ctx, "config");
        let (result, warnings) = ctx.finish();
        self.warnings = warnings;
        result
    }

    fn reset_warnings(&mut self) {
        self.warnings.clear();
    }
}

/// Global configuration knobs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOptions {
    /// Whether ports may be preempted from other sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_preemption: Option<bool>,
}

impl Validate for ConfigOptions {
    fn check(&self, _ctx: &mut ValidationContext, _path: &str) {}
}

// ─── Device ──────────────────────────────────────────────────────────

/// An emulated device bound to a test port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Device {
    /// Required. Unique key within one configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Required link-layer properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ethernet: Option<Ethernet>,
}

impl Device {
    /// Set the device name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// The device name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Link-layer properties, created on first access.
    pub fn ethernet(&mut self) -> &mut Ethernet {
        self.ethernet.get_or_insert_with(Ethernet::default)
    }
}

impl Validate for Device {
    fn check(&self, ctx: &mut ValidationContext, path: &str) {
        ctx.require(self.name.is_some(), "name", "Device");
        if let Some(name) = &self.name {
            ctx.register_unique("Device", "name", name, path);
        }
        ctx.require(self.ethernet.is_some(), "ethernet", "Device");
        if let Some(ethernet) = &self.ethernet {
            ethernet.check(ctx, &format!("{path}.ethernet"));
        }
    }
}

/// Link-layer properties of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ethernet {
    /// Source MAC, single value or generated sequence.
    #[serde(default)]
    mac: MacPattern,
    /// Maximum transmission unit, 64..=9000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mtu: Option<u32>,
    /// 802.1Q tag, 0..=4095. Under review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vlan_id: Option<u32>,
    /// Optional network-layer properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv4: Option<DeviceIpv4>,
}

impl Default for Ethernet {
    fn default() -> Self {
        Self {
            mac: MacPattern::with_default("00:00:00:00:00:00"),
            mtu: None,
            vlan_id: None,
            ipv4: None,
        }
    }
}

impl Ethernet {
    /// The MAC pattern field.
    pub fn mac(&mut self) -> &mut MacPattern {
        &mut self.mac
    }

    /// Read-only view of the MAC pattern field.
    pub fn mac_ref(&self) -> &MacPattern {
        &self.mac
    }

    /// Set the maximum transmission unit.
    pub fn set_mtu(&mut self, mtu: u32) -> &mut Self {
        self.mtu = Some(mtu);
        self
    }

    /// Set the 802.1Q tag.
    pub fn set_vlan_id(&mut self, vlan_id: u32) -> &mut Self {
        self.vlan_id = Some(vlan_id);
        self
    }

    /// Network-layer properties, created on first access.
    pub fn ipv4(&mut self) -> &mut DeviceIpv4 {
        self.ipv4.get_or_insert_with(DeviceIpv4::default)
    }
}

impl Validate for Ethernet {
    fn check(&self, ctx: &mut ValidationContext, path: &str) {
        for e in self.mac.check(&format!("{path}.mac")) {
            ctx.error(e);
        }
        if let Some(mtu) = self.mtu {
            ctx.check_range(mtu, 64, 9000, "mtu", "Ethernet");
        }
        if let Some(vlan_id) = self.vlan_id {
            ctx.under_review(
                "vlan_id",
                "Ethernet",
                "single-tag semantics may change when QinQ lands",
            );
            ctx.check_range(vlan_id, 0, 4095, "vlan_id", "Ethernet");
        }
        if let Some(ipv4) = &self.ipv4 {
            ipv4.check(ctx, &format!("{path}.ipv4"));
        }
    }
}

/// Network-layer properties of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceIpv4 {
    /// Interface address, single value or generated sequence.
    #[serde(default)]
    address: Ipv4Pattern,
    /// Prefix length, 0..=32.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<u32>,
    /// Next-hop gateway, dotted decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gateway: Option<String>,
}

impl Default for DeviceIpv4 {
    fn default() -> Self {
        Self {
            address: Ipv4Pattern::with_default("0.0.0.0"),
            prefix: None,
            gateway: None,
        }
    }
}

impl DeviceIpv4 {
    /// The address pattern field.
    pub fn address(&mut self) -> &mut Ipv4Pattern {
        &mut self.address
    }

    /// Read-only view of the address pattern field.
    pub fn address_ref(&self) -> &Ipv4Pattern {
        &self.address
    }

    /// Set the prefix length.
    pub fn set_prefix(&mut self, prefix: u32) -> &mut Self {
        self.prefix = Some(prefix);
        self
    }

    /// Set the next-hop gateway.
    pub fn set_gateway(&mut self, gateway: impl Into<String>) -> &mut Self {
        self.gateway = Some(gateway.into());
        self
    }
}

impl Validate for DeviceIpv4 {
    fn check(&self, ctx: &mut ValidationContext, path: &str) {
        for e in self.address.check(&format!("{path}.address")) {
            ctx.error(e);
        }
        if let Some(prefix) = self.prefix {
            ctx.check_range(prefix, 0, 32, "prefix", "DeviceIpv4");
        }
        if let Some(gateway) = &self.gateway {
            ctx.check_format(format::validate_ipv4(gateway), path, "gateway");
        }
    }
}

// ─── Flow ────────────────────────────────────────────────────────────

/// A traffic flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flow {
    /// Required. Unique key within one configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Transmitting device; must name an existing `Device.name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_device: Option<String>,
    /// Per-packet priority value.
    #[serde(default)]
    priority: IntegerPattern,
    /// Transmit rate, oneof pps/percentage/gbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate: Option<FlowRate>,
    /// Transmit duration, oneof continuous/fixed_packets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<FlowDuration>,
    /// Deprecated free-form description, 1..=128 chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Default for Flow {
    fn default() -> Self {
        Self {
            name: None,
            tx_device: None,
            priority: IntegerPattern::with_default("0"),
            rate: None,
            duration: None,
            description: None,
        }
    }
}

impl Flow {
    /// Set the flow name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// The flow name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the transmitting device reference.
    pub fn set_tx_device(&mut self, device: impl Into<String>) -> &mut Self {
        self.tx_device = Some(device.into());
        self
    }

    /// The priority pattern field.
    pub fn priority(&mut self) -> &mut IntegerPattern {
        &mut self.priority
    }

    /// Transmit rate, created on first access.
    pub fn rate(&mut self) -> &mut FlowRate {
        self.rate.get_or_insert_with(FlowRate::default)
    }

    /// Transmit duration, created on first access.
    pub fn duration(&mut self) -> &mut FlowDuration {
        self.duration.get_or_insert_with(FlowDuration::default)
    }

    /// Set the deprecated free-form description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for Flow {
    fn check(&self, ctx: &mut ValidationContext, path: &str) {
        ctx.require(self.name.is_some(), "name", "Flow");
        if let Some(name) = &self.name {
            ctx.register_unique("Flow", "name", name, path);
        }
        if let Some(tx_device) = &self.tx_device {
            ctx.constrain(tx_device, "Device", "name");
        }
        for e in self.priority.check(&format!("{path}.priority")) {
            ctx.error(e);
        }
        if let Some(rate) = &self.rate {
            rate.check(ctx, &format!("{path}.rate"));
        }
        if let Some(duration) = &self.duration {
            duration.check(ctx, &format!("{path}.duration"));
        }
        if let Some(description) = &self.description {
            ctx.deprecated("description", "Flow", "use name instead");
            ctx.check_length(description, 1, 128, "description", "Flow");
        }
    }
}

// ─── FlowRate (choice) ───────────────────────────────────────────────

/// Variants of [`FlowRate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRateChoice {
    /// Packets per second.
    #[default]
    Pps,
    /// Percentage of line rate.
    Percentage,
    /// Gigabits per second. Deprecated constant.
    Gbps,
}

impl std::fmt::Display for FlowRateChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pps => "PPS",
            Self::Percentage => "PERCENTAGE",
            Self::Gbps => "GBPS",
        };
        f.write_str(s)
    }
}

/// Transmit rate for a flow: exactly one of pps, percentage or gbps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowRate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice: Option<FlowRateChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gbps: Option<u32>,
}

impl FlowRate {
    /// The active variant; the declared default (`pps`) before any accessor
    /// has run.
    pub fn choice(&self) -> FlowRateChoice {
        self.choice.unwrap_or_default()
    }

    /// Select packets-per-second, materializing the default value if absent.
    pub fn pps(&mut self) -> &mut u64 {
        self.choice = Some(FlowRateChoice::Pps);
        self.pps.get_or_insert(1000)
    }

    /// Select percentage-of-line-rate, materializing the default if absent.
    pub fn percentage(&mut self) -> &mut f64 {
        self.choice = Some(FlowRateChoice::Percentage);
        self.percentage.get_or_insert(100.0)
    }

    /// Select gigabits-per-second, materializing the default if absent.
    /// The constant is deprecated; validation warns on every pass.
    pub fn gbps(&mut self) -> &mut u32 {
        self.choice = Some(FlowRateChoice::Gbps);
        self.gbps.get_or_insert(1)
    }
}

impl Validate for FlowRate {
    fn check(&self, ctx: &mut ValidationContext, _path: &str) {
        match self.choice() {
            FlowRateChoice::Pps => {
                if let Some(pps) = self.pps {
                    ctx.check_range(pps, 1, 1_000_000_000, "pps", "FlowRate");
                }
            }
            FlowRateChoice::Percentage => {
                if let Some(percentage) = self.percentage {
                    ctx.check_range(percentage, 0.0, 100.0, "percentage", "FlowRate");
                }
            }
            FlowRateChoice::Gbps => {
                ctx.warning(
                    "GBPS enum value in FlowRate.choice is deprecated, use pps or percentage instead",
                );
                if let Some(gbps) = self.gbps {
                    ctx.check_range(gbps, 1, 400, "gbps", "FlowRate");
                }
            }
        }
    }
}

// ─── FlowDuration (choice) ───────────────────────────────────────────

/// Variants of [`FlowDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDurationChoice {
    /// Transmit until stopped. Pure marker, no properties of its own.
    Continuous,
    /// Transmit a fixed number of packets.
    FixedPackets,
}

impl std::fmt::Display for FlowDurationChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Continuous => "CONTINUOUS",
            Self::FixedPackets => "FIXED_PACKETS",
        };
        f.write_str(s)
    }
}

/// Transmit duration for a flow. The choice is required: a duration object
/// with no variant ever selected fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowDuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice: Option<FlowDurationChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_packets: Option<FixedPackets>,
}

impl FlowDuration {
    /// The active variant, if any has been selected.
    pub fn choice(&self) -> Option<FlowDurationChoice> {
        self.choice
    }

    /// Select continuous transmission. The variant carries no data and
    /// serializes as just the discriminator.
    pub fn continuous(&mut self) -> &mut Self {
        self.choice = Some(FlowDurationChoice::Continuous);
        self
    }

    /// Select fixed-packet-count transmission, materializing the default
    /// sub-object if absent.
    pub fn fixed_packets(&mut self) -> &mut FixedPackets {
        self.choice = Some(FlowDurationChoice::FixedPackets);
        self.fixed_packets.get_or_insert_with(FixedPackets::default)
    }
}

impl Validate for FlowDuration {
    fn check(&self, ctx: &mut ValidationContext, _path: &str) {
        ctx.require(self.choice.is_some(), "choice", "FlowDuration");
        if self.choice == Some(FlowDurationChoice::FixedPackets) {
            if let Some(fixed) = &self.fixed_packets {
                if let Some(packets) = fixed.packets {
                    ctx.check_range(packets, 1, 1_000_000_000, "packets", "FixedPackets");
                }
            }
        }
    }
}

impl Validated for FlowDuration {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let (result, _) = crate::validate::validate(self, "flow_duration");
        result
    }
}

/// Fixed-packet-count duration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedPackets {
    /// Number of packets to transmit, 1..=1e9.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    packets: Option<u32>,
}

impl FixedPackets {
    /// Packet count, materializing the default (1000) if absent.
    pub fn packets(&mut self) -> &mut u32 {
        self.packets.get_or_insert(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, WireObject};

    fn valid_config() -> Config {
        let mut cfg = Config::new();
        let device = cfg.add_device();
        device.set_name("d1");
        device.ethernet().mac().set_value("ab:ab:10:12:ff:ff");
        device.ethernet().ipv4().address().set_value("10.0.0.1");
        let flow = cfg.add_flow();
        flow.set_name("f1");
        flow.set_tx_device("d1");
        *flow.rate().pps() = 5000;
        flow.duration().continuous();
        cfg
    }

    #[test]
    fn valid_config_passes() {
        let mut cfg = valid_config();
        cfg.validate().unwrap();
        assert!(cfg.warnings().is_empty());
    }

    #[test]
    fn missing_required_fields_aggregate() {
        let mut cfg = Config::new();
        cfg.add_device();
        let err = cfg.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("name is required field on interface Device"));
        assert!(text.contains("ethernet is required field on interface Device"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn duplicate_device_names_conflict_and_rename_resolves() {
        let mut cfg = valid_config();
        let device = cfg.add_device();
        device.set_name("d1");
        device.ethernet();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("name with d1 already exists"));

        cfg.devices_mut()[1].set_name("d2");
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_tx_device_is_flagged() {
        let mut cfg = valid_config();
        cfg.flows_mut()[0].set_tx_device("ghost");
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "ghost is not a valid Device.name type"
        );
    }

    #[test]
    fn bounds_violations_report_observed_values() {
        let mut cfg = valid_config();
        cfg.devices_mut()[0].ethernet().set_mtu(9001);
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "mtu on Ethernet should be between 64 and 9000, got 9001"
        );
    }

    #[test]
    fn format_violation_names_path_and_field() {
        let mut cfg = valid_config();
        cfg.devices_mut()[0]
            .ethernet()
            .ipv4()
            .set_gateway("256.1.1.1");
        let err = cfg.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("256.1.1.1"));
        assert!(text.ends_with("on config.devices[0].ethernet.ipv4.gateway"));
    }

    #[test]
    fn pattern_errors_surface_with_paths() {
        let mut cfg = valid_config();
        cfg.devices_mut()[0]
            .ethernet()
            .mac()
            .set_values(["ok:no:pe", "00:00:00:00:00:01"]);
        let err = cfg.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid mac addresses at indices 0 on config.devices[0].ethernet.mac.values"));
    }

    #[test]
    fn choice_default_is_first_declared_variant() {
        let rate = FlowRate::default();
        assert_eq!(rate.choice(), FlowRateChoice::Pps);
        let req = crate::metrics::MetricsRequest::default();
        assert_eq!(req.choice(), crate::metrics::MetricsRequestChoice::Port);
    }

    #[test]
    fn choice_switching_keeps_sibling_data() {
        let mut rate = FlowRate::default();
        *rate.pps() = 1234;
        *rate.percentage() = 50.0;
        assert_eq!(rate.choice(), FlowRateChoice::Percentage);
        // Switching back restores the previously stored value.
        assert_eq!(*rate.pps(), 1234);
        assert_eq!(rate.choice(), FlowRateChoice::Pps);
    }

    #[test]
    fn marker_variant_serializes_as_discriminator_only() {
        let mut duration = FlowDuration::default();
        duration.continuous();
        let json = duration.encode_json().unwrap();
        assert_eq!(json, r#"{"choice":"continuous"}"#);
    }

    #[test]
    fn required_choice_with_no_variant_fails() {
        let mut cfg = valid_config();
        cfg.flows_mut()[0].duration = Some(FlowDuration::default());
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "choice is required field on interface FlowDuration"
        );
    }

    #[test]
    fn deprecated_field_warns_without_failing() {
        let mut cfg = valid_config();
        cfg.flows_mut()[0].set_description("legacy");
        cfg.validate().unwrap();
        let warnings = cfg.warnings();
        assert_eq!(
            warnings,
            vec!["description property in schema Flow is deprecated, use name instead"]
        );
    }

    #[test]
    fn deprecated_enum_value_warns_with_constant_name() {
        let mut cfg = valid_config();
        *cfg.flows_mut()[0].rate().gbps() = 2;
        cfg.validate().unwrap();
        let warnings = cfg.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("GBPS enum value in FlowRate.choice is deprecated"));
    }

    #[test]
    fn warnings_are_one_shot_and_do_not_accumulate() {
        let mut cfg = valid_config();
        cfg.flows_mut()[0].set_description("legacy");
        cfg.validate().unwrap();
        let first = cfg.warnings();
        assert_eq!(first.len(), 1);
        // Drained: nothing left until the next pass.
        assert!(cfg.warnings().is_empty());
        // A fresh pass reproduces the same single warning, not two.
        cfg.validate().unwrap();
        assert_eq!(cfg.warnings(), first);
    }

    #[test]
    fn under_review_field_warns() {
        let mut cfg = valid_config();
        cfg.devices_mut()[0].ethernet().set_vlan_id(100);
        cfg.validate().unwrap();
        let warnings = cfg.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("vlan_id property in schema Ethernet is under review"));
    }

    #[test]
    fn round_trip_all_formats() {
        let mut cfg = valid_config();

        let json = cfg.to_json().unwrap();
        let mut from_json = Config::new();
        from_json.from_json(&json).unwrap();
        assert_eq!(from_json.to_json().unwrap(), json);

        let yaml = cfg.to_yaml().unwrap();
        let mut from_yaml = Config::new();
        from_yaml.from_yaml(&yaml).unwrap();
        assert_eq!(from_yaml.to_yaml().unwrap(), yaml);

        let text = cfg.to_text().unwrap();
        let mut from_text = Config::new();
        from_text.from_text(&text).unwrap();
        assert_eq!(from_text.to_text().unwrap(), text);

        let binary = cfg.to_binary().unwrap();
        let mut from_binary = Config::new();
        from_binary.from_binary(&binary).unwrap();
        assert_eq!(from_binary.to_binary().unwrap(), binary);
    }

    #[test]
    fn marshal_surfaces_validation_error() {
        let mut cfg = Config::new();
        cfg.add_flow();
        let err = cfg.to_json().unwrap_err();
        match err {
            CodecError::Validation(e) => {
                assert!(e.to_string().contains("name is required field on interface Flow"));
            }
            other => panic!("expected Validation, got {other}"),
        }
        // The direct encode path skips validation.
        cfg.encode_json().unwrap();
    }

    #[test]
    fn decode_rejects_unknown_keys_distinctly() {
        let mut cfg = Config::new();
        let err = cfg.from_json(r#"{"devcies":[]}"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidKey(_)));
        let err = cfg.from_json(r#"{"devices":[}"#).unwrap_err();
        assert!(matches!(err, CodecError::Unmarshal(_)));
    }

    #[test]
    fn decode_failure_leaves_state_untouched() {
        let mut cfg = valid_config();
        let before = cfg.encode_json().unwrap();
        assert!(cfg.from_json("{not json").is_err());
        assert_eq!(cfg.encode_json().unwrap(), before);
    }

    #[test]
    fn decode_replaces_state_wholesale() {
        let mut cfg = valid_config();
        let snapshot = cfg.to_json().unwrap();

        let mut other = Config::new();
        other.add_device().set_name("other");
        other.from_json(&snapshot).unwrap();
        assert_eq!(other.devices().len(), 1);
        assert_eq!(other.devices()[0].name(), Some("d1"));
    }

    #[test]
    fn end_to_end_text_scenario() {
        let mut cfg = valid_config();
        let text = cfg.to_text().unwrap();

        let mut decoded = Config::new();
        decoded.from_text(&text).unwrap();
        assert_eq!(decoded.to_text().unwrap(), text);

        // Drop the required nested object: validation must name the interface.
        let mut broken = Config::new();
        broken.add_device().set_name("d1");
        let err = broken.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("ethernet is required field on interface Device"));
    }
}
