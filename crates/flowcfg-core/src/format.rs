//! # Address Format Validators
//!
//! Pure syntax checks and integer-domain conversions for the address
//! families the runtime handles: MAC-48, IPv4, IPv6, free-form hex, and
//! dotted OID arcs.
//!
//! Validation and parsing are the same code path: `validate_*` is `parse_*`
//! with the value discarded, so a string accepted by the validator is
//! guaranteed to parse wherever the pattern codec needs its integer form.

use thiserror::Error;

/// MAC addresses occupy the low 48 bits of a `u64`.
pub const MAC_MASK: u64 = 0xffff_ffff_ffff;

/// A malformed address or identifier string.
///
/// MAC and IPv4 variants carry the 1-indexed position of the octet that
/// failed, so callers can surface actionable messages without re-parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A MAC octet is not a 1-2 digit hex byte.
    #[error("invalid MAC address {value:?}, octet {position} ({octet:?}) is not a hex byte")]
    MacOctet {
        /// The full input string.
        value: String,
        /// The octet that failed to parse.
        octet: String,
        /// 1-indexed octet position.
        position: usize,
    },

    /// A MAC address does not have exactly 6 colon-separated octets.
    #[error("invalid MAC address {value:?}, expected 6 colon-separated octets, found {found}")]
    MacShape {
        /// The full input string.
        value: String,
        /// Number of octets found.
        found: usize,
    },

    /// An IPv4 octet is not a decimal value in 0..=255.
    #[error("invalid IPv4 address {value:?}, octet {position} ({octet:?}) is not in 0..=255")]
    Ipv4Octet {
        /// The full input string.
        value: String,
        /// The octet that failed to parse.
        octet: String,
        /// 1-indexed octet position.
        position: usize,
    },

    /// An IPv4 address does not have exactly 4 dot-separated octets.
    #[error("invalid IPv4 address {value:?}, expected 4 dot-separated octets, found {found}")]
    Ipv4Shape {
        /// The full input string.
        value: String,
        /// Number of octets found.
        found: usize,
    },

    /// A malformed IPv6 address.
    #[error("invalid IPv6 address {value:?}, {reason}")]
    Ipv6 {
        /// The full input string.
        value: String,
        /// What broke.
        reason: String,
    },

    /// A malformed hex string.
    #[error("invalid hex value {value:?}, {reason}")]
    Hex {
        /// The full input string.
        value: String,
        /// What broke.
        reason: String,
    },

    /// A malformed object identifier.
    #[error("invalid OID {value:?}, {reason}")]
    Oid {
        /// The full input string.
        value: String,
        /// What broke.
        reason: String,
    },

    /// A malformed unsigned integer.
    #[error("invalid integer {value:?}, expected an unsigned 32-bit decimal")]
    Integer {
        /// The full input string.
        value: String,
    },
}

/// Parse an unsigned 32-bit decimal, rejecting signs and stray characters.
pub fn parse_u32(value: &str) -> Result<u32, FormatError> {
    let ok = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    if ok {
        if let Ok(v) = value.parse::<u32>() {
            return Ok(v);
        }
    }
    Err(FormatError::Integer {
        value: value.to_string(),
    })
}

// ─── MAC ─────────────────────────────────────────────────────────────

/// Parse a colon-separated MAC address into its 48-bit integer form.
pub fn parse_mac(value: &str) -> Result<u64, FormatError> {
    let octets: Vec<&str> = value.split(':').collect();
    if octets.len() != 6 {
        return Err(FormatError::MacShape {
            value: value.to_string(),
            found: octets.len(),
        });
    }
    let mut out: u64 = 0;
    for (i, octet) in octets.iter().enumerate() {
        if octet.is_empty() || octet.len() > 2 {
            return Err(FormatError::MacOctet {
                value: value.to_string(),
                octet: (*octet).to_string(),
                position: i + 1,
            });
        }
        let byte = u8::from_str_radix(octet, 16).map_err(|_| FormatError::MacOctet {
            value: value.to_string(),
            octet: (*octet).to_string(),
            position: i + 1,
        })?;
        out = (out << 8) | u64::from(byte);
    }
    Ok(out)
}

/// Check that a string is a well-formed MAC address.
pub fn validate_mac(value: &str) -> Result<(), FormatError> {
    parse_mac(value).map(|_| ())
}

/// Format a 48-bit integer as a lowercase colon-separated MAC address.
///
/// Bits above 48 are ignored.
pub fn format_mac(value: u64) -> String {
    let v = value & MAC_MASK;
    let b = v.to_be_bytes();
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        b[2], b[3], b[4], b[5], b[6], b[7]
    )
}

// ─── IPv4 ────────────────────────────────────────────────────────────

/// Parse a dotted-decimal IPv4 address into its 32-bit integer form.
pub fn parse_ipv4(value: &str) -> Result<u32, FormatError> {
    let octets: Vec<&str> = value.split('.').collect();
    if octets.len() != 4 {
        return Err(FormatError::Ipv4Shape {
            value: value.to_string(),
            found: octets.len(),
        });
    }
    let mut out: u32 = 0;
    for (i, octet) in octets.iter().enumerate() {
        // `u8::from_str` accepts a leading '+', which is not dotted-decimal.
        let ok = !octet.is_empty()
            && octet.len() <= 3
            && octet.bytes().all(|b| b.is_ascii_digit());
        let parsed = if ok { octet.parse::<u16>().ok() } else { None };
        match parsed {
            Some(b) if b <= 255 => out = (out << 8) | u32::from(b),
            _ => {
                return Err(FormatError::Ipv4Octet {
                    value: value.to_string(),
                    octet: (*octet).to_string(),
                    position: i + 1,
                })
            }
        }
    }
    Ok(out)
}

/// Check that a string is a well-formed dotted-decimal IPv4 address.
pub fn validate_ipv4(value: &str) -> Result<(), FormatError> {
    parse_ipv4(value).map(|_| ())
}

/// Format a 32-bit integer as a dotted-decimal IPv4 address.
pub fn format_ipv4(value: u32) -> String {
    let b = value.to_be_bytes();
    format!("{}.{}.{}.{}", b[0], b[1], b[2], b[3])
}

// ─── IPv6 ────────────────────────────────────────────────────────────

fn ipv6_err(value: &str, reason: impl Into<String>) -> FormatError {
    FormatError::Ipv6 {
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_ipv6_groups(value: &str, part: &str) -> Result<Vec<u16>, FormatError> {
    if part.is_empty() {
        return Ok(Vec::new());
    }
    part.split(':')
        .map(|group| {
            if group.is_empty() || group.len() > 4 {
                return Err(ipv6_err(
                    value,
                    format!("segment {group:?} is not 1-4 hex digits"),
                ));
            }
            u16::from_str_radix(group, 16)
                .map_err(|_| ipv6_err(value, format!("segment {group:?} is not 1-4 hex digits")))
        })
        .collect()
}

/// Parse an IPv6 address (with optional `::` compression) into its 128-bit
/// integer form.
///
/// The dotted-quad embedded-IPv4 notation is not part of the wire contract
/// and is rejected.
pub fn parse_ipv6(value: &str) -> Result<u128, FormatError> {
    if !value.contains(':') {
        return Err(ipv6_err(value, "expected colon-separated hex segments"));
    }
    if value.contains('.') {
        return Err(ipv6_err(value, "embedded IPv4 notation is not supported"));
    }

    let halves: Vec<&str> = value.splitn(3, "::").collect();
    let groups: Vec<u16> = match halves.as_slice() {
        // No compression: exactly 8 segments required.
        [whole] => {
            let groups = parse_ipv6_groups(value, whole)?;
            if groups.len() != 8 {
                return Err(ipv6_err(
                    value,
                    format!("expected 8 segments, found {}", groups.len()),
                ));
            }
            groups
        }
        [head, tail] => {
            let head = parse_ipv6_groups(value, head)?;
            let tail = parse_ipv6_groups(value, tail)?;
            if head.len() + tail.len() > 7 {
                return Err(ipv6_err(value, "'::' must compress at least one segment"));
            }
            let mut groups = head;
            groups.resize(8 - tail.len(), 0);
            groups.extend(tail);
            groups
        }
        _ => return Err(ipv6_err(value, "more than one '::' compression")),
    };

    let mut out: u128 = 0;
    for group in groups {
        out = (out << 16) | u128::from(group);
    }
    Ok(out)
}

/// Check that a string is a well-formed IPv6 address.
pub fn validate_ipv6(value: &str) -> Result<(), FormatError> {
    parse_ipv6(value).map(|_| ())
}

/// Format a 128-bit integer as an IPv6 address, compressing the longest run
/// of zero segments per RFC 5952.
pub fn format_ipv6(value: u128) -> String {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = ((value >> (112 - 16 * i)) & 0xffff) as u16;
    }

    // Longest run of zero groups, length >= 2, earliest wins ties.
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, group) in groups.iter().enumerate() {
        if *group == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len >= 2 && best.map_or(true, |(_, len)| run_len > len) {
                best = Some((run_start, run_len));
            }
        } else {
            run_len = 0;
        }
    }

    match best {
        Some((start, len)) => {
            let head: Vec<String> = groups[..start].iter().map(|g| format!("{g:x}")).collect();
            let tail: Vec<String> = groups[start + len..]
                .iter()
                .map(|g| format!("{g:x}"))
                .collect();
            format!("{}::{}", head.join(":"), tail.join(":"))
        }
        None => groups
            .iter()
            .map(|g| format!("{g:x}"))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

// ─── Hex / OID ───────────────────────────────────────────────────────

/// Check that a string is a non-empty hex value, with optional `0x` prefix.
pub fn validate_hex(value: &str) -> Result<(), FormatError> {
    let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
    if digits.is_empty() {
        return Err(FormatError::Hex {
            value: value.to_string(),
            reason: "no hex digits".to_string(),
        });
    }
    match digits.bytes().position(|b| !b.is_ascii_hexdigit()) {
        None => Ok(()),
        Some(i) => Err(FormatError::Hex {
            value: value.to_string(),
            reason: format!("non-hex character at offset {i}"),
        }),
    }
}

/// Check that a string is a well-formed dotted object identifier.
///
/// Requires at least two decimal arcs; the first arc must be 0, 1 or 2, and
/// when the first arc is 0 or 1 the second must be below 40 (X.660 rules).
pub fn validate_oid(value: &str) -> Result<(), FormatError> {
    let oid_err = |reason: String| FormatError::Oid {
        value: value.to_string(),
        reason,
    };
    let arcs: Vec<&str> = value.split('.').collect();
    if arcs.len() < 2 {
        return Err(oid_err("expected at least two dot-separated arcs".to_string()));
    }
    let mut parsed = Vec::with_capacity(arcs.len());
    for arc in &arcs {
        let ok = !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit());
        match if ok { arc.parse::<u64>().ok() } else { None } {
            Some(n) => parsed.push(n),
            None => return Err(oid_err(format!("arc {arc:?} is not a decimal number"))),
        }
    }
    if parsed[0] > 2 {
        return Err(oid_err(format!("first arc must be 0, 1 or 2, got {}", parsed[0])));
    }
    if parsed[0] < 2 && parsed[1] > 39 {
        return Err(oid_err(format!(
            "second arc must be below 40 when the first arc is {}, got {}",
            parsed[0], parsed[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ipv4() {
        assert!(validate_ipv4("1.2.3.4").is_ok());
        assert!(validate_ipv4("0.0.0.0").is_ok());
        assert!(validate_ipv4("255.255.255.255").is_ok());
    }

    #[test]
    fn invalid_ipv4() {
        assert!(validate_ipv4("1.2.3.4.5").is_err());
        assert!(validate_ipv4("256.1.1.1").is_err());
        assert!(validate_ipv4("-1.1.1.1").is_err());
        assert!(validate_ipv4("1.2.3").is_err());
        assert!(validate_ipv4("a.b.c.d").is_err());
        assert!(validate_ipv4("").is_err());
    }

    #[test]
    fn ipv4_error_names_octet_position() {
        let err = validate_ipv4("256.1.1.1").unwrap_err();
        match err {
            FormatError::Ipv4Octet { octet, position, .. } => {
                assert_eq!(octet, "256");
                assert_eq!(position, 1);
            }
            other => panic!("expected Ipv4Octet, got {other}"),
        }
        let err = validate_ipv4("1.1.999.1").unwrap_err();
        assert!(err.to_string().contains("octet 3"));
    }

    #[test]
    fn ipv4_round_trip() {
        assert_eq!(parse_ipv4("1.2.3.4").unwrap(), 0x0102_0304);
        assert_eq!(format_ipv4(0x0102_0304), "1.2.3.4");
        assert_eq!(format_ipv4(parse_ipv4("255.255.255.255").unwrap()), "255.255.255.255");
    }

    #[test]
    fn valid_ipv6() {
        assert!(validate_ipv6("::").is_ok());
        assert!(validate_ipv6("abcd::1234").is_ok());
        assert!(validate_ipv6("::1").is_ok());
        assert!(validate_ipv6("2001:db8:0:0:0:0:0:1").is_ok());
        assert!(validate_ipv6("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff").is_ok());
    }

    #[test]
    fn invalid_ipv6() {
        assert!(validate_ipv6("1.1.1.1").is_err());
        assert!(validate_ipv6("ffff0::ffff0").is_err());
        assert!(validate_ipv6("1:2:3:4:5:6:7:8:9").is_err());
        assert!(validate_ipv6("1:2:3:4:5:6:7").is_err());
        assert!(validate_ipv6("::: ").is_err());
        assert!(validate_ipv6("g::1").is_err());
    }

    #[test]
    fn ipv6_parse_values() {
        assert_eq!(parse_ipv6("::").unwrap(), 0);
        assert_eq!(parse_ipv6("::1").unwrap(), 1);
        assert_eq!(
            parse_ipv6("abcd::1234").unwrap(),
            (0xabcd_u128 << 112) | 0x1234
        );
    }

    #[test]
    fn ipv6_format_compresses_longest_zero_run() {
        assert_eq!(format_ipv6(0), "::");
        assert_eq!(format_ipv6(1), "::1");
        assert_eq!(format_ipv6((0xabcd_u128 << 112) | 0x1234), "abcd::1234");
        assert_eq!(format_ipv6(u128::MAX), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn valid_mac() {
        assert!(validate_mac("ab:ab:10:12:ff:ff").is_ok());
        assert!(validate_mac("00:00:00:00:00:00").is_ok());
        assert!(validate_mac("FF:FF:FF:FF:FF:FF").is_ok());
    }

    #[test]
    fn invalid_mac() {
        assert!(validate_mac("00:00:00:00:gg:00").is_err());
        assert!(validate_mac("00:00:00:00:00").is_err());
        assert!(validate_mac("00:00:00:00:00:00:00").is_err());
        assert!(validate_mac("000:00:00:00:00:00").is_err());
    }

    #[test]
    fn mac_error_names_octet_position() {
        let err = validate_mac("00:00:00:00:gg:00").unwrap_err();
        match err {
            FormatError::MacOctet { octet, position, .. } => {
                assert_eq!(octet, "gg");
                assert_eq!(position, 5);
            }
            other => panic!("expected MacOctet, got {other}"),
        }
    }

    #[test]
    fn mac_round_trip() {
        assert_eq!(parse_mac("ff:ff:ff:ff:ff:ff").unwrap(), MAC_MASK);
        assert_eq!(format_mac(MAC_MASK), "ff:ff:ff:ff:ff:ff");
        assert_eq!(format_mac(parse_mac("ab:cd:ef:01:23:45").unwrap()), "ab:cd:ef:01:23:45");
        // Bits above 48 are masked off.
        assert_eq!(format_mac(u64::MAX), "ff:ff:ff:ff:ff:ff");
    }

    #[test]
    fn hex_values() {
        assert!(validate_hex("0xdeadbeef").is_ok());
        assert!(validate_hex("deadBEEF01").is_ok());
        assert!(validate_hex("0x").is_err());
        assert!(validate_hex("").is_err());
        assert!(validate_hex("xyz").is_err());
    }

    #[test]
    fn oid_values() {
        assert!(validate_oid("1.3.6.1.2.1").is_ok());
        assert!(validate_oid("0.39").is_ok());
        assert!(validate_oid("2.999.1").is_ok());
        assert!(validate_oid("1").is_err());
        assert!(validate_oid("3.1").is_err());
        assert!(validate_oid("1.40").is_err());
        assert!(validate_oid("1.3..6").is_err());
        assert!(validate_oid("1.a").is_err());
    }
}
