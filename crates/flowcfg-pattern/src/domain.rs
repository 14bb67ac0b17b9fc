//! # Pattern Value Domains
//!
//! Each address family a pattern field can range over is a zero-sized type
//! implementing [`PatternDomain`]. The domain supplies the natural unsigned
//! integer representation (IPv4 → u32, MAC → 48 bits of a u64, IPv6 → u128),
//! parse/format conversions, the full-range defaults for random generation,
//! and wrapping arithmetic at the domain's bit width.
//!
//! ## Design Decision
//!
//! Domains are a trait with unit-struct impls rather than a runtime enum:
//! the set of families is closed and known at compile time, and the pattern
//! codec is generic over the family so a MAC pattern and an IPv4 pattern are
//! distinct types that cannot be mixed up.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;

use flowcfg_core::format::{
    self, format_ipv4, format_ipv6, format_mac, parse_ipv4, parse_ipv6, parse_mac, parse_u32,
    FormatError,
};

/// An address family a pattern field can range over.
pub trait PatternDomain: Clone + Copy + fmt::Debug + Default + PartialEq + 'static {
    /// Natural unsigned integer representation of one value.
    type Repr: Copy + PartialOrd + fmt::Debug;

    /// Human name used in aggregated validation messages ("mac", "ipv4", ...).
    const NAME: &'static str;

    /// Parse a wire string into the integer representation.
    fn parse(value: &str) -> Result<Self::Repr, FormatError>;

    /// Format an integer representation as its wire string.
    fn format(value: Self::Repr) -> String;

    /// Lowest value of the domain (default random `min`).
    fn domain_min() -> Self::Repr;

    /// Highest value of the domain (default random `max`).
    fn domain_max() -> Self::Repr;

    /// The unit step, used when a counter omits `step`.
    fn one() -> Self::Repr;

    /// Addition wrapping at the domain's bit width.
    fn wrapping_add(a: Self::Repr, b: Self::Repr) -> Self::Repr;

    /// Subtraction wrapping at the domain's bit width.
    fn wrapping_sub(a: Self::Repr, b: Self::Repr) -> Self::Repr;

    /// Draw one uniformly distributed value from `min..=max`.
    fn sample(rng: &mut StdRng, min: Self::Repr, max: Self::Repr) -> Self::Repr;
}

/// IPv4 addresses as 32-bit unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ipv4Domain;

impl PatternDomain for Ipv4Domain {
    type Repr = u32;
    const NAME: &'static str = "ipv4";

    fn parse(value: &str) -> Result<u32, FormatError> {
        parse_ipv4(value)
    }

    fn format(value: u32) -> String {
        format_ipv4(value)
    }

    fn domain_min() -> u32 {
        0
    }

    fn domain_max() -> u32 {
        u32::MAX
    }

    fn one() -> u32 {
        1
    }

    fn wrapping_add(a: u32, b: u32) -> u32 {
        a.wrapping_add(b)
    }

    fn wrapping_sub(a: u32, b: u32) -> u32 {
        a.wrapping_sub(b)
    }

    fn sample(rng: &mut StdRng, min: u32, max: u32) -> u32 {
        rng.gen_range(min..=max)
    }
}

/// IPv6 addresses as 128-bit unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ipv6Domain;

impl PatternDomain for Ipv6Domain {
    type Repr = u128;
    const NAME: &'static str = "ipv6";

    fn parse(value: &str) -> Result<u128, FormatError> {
        parse_ipv6(value)
    }

    fn format(value: u128) -> String {
        format_ipv6(value)
    }

    fn domain_min() -> u128 {
        0
    }

    fn domain_max() -> u128 {
        u128::MAX
    }

    fn one() -> u128 {
        1
    }

    fn wrapping_add(a: u128, b: u128) -> u128 {
        a.wrapping_add(b)
    }

    fn wrapping_sub(a: u128, b: u128) -> u128 {
        a.wrapping_sub(b)
    }

    fn sample(rng: &mut StdRng, min: u128, max: u128) -> u128 {
        rng.gen_range(min..=max)
    }
}

/// MAC addresses as the low 48 bits of a u64; arithmetic wraps at 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacDomain;

impl PatternDomain for MacDomain {
    type Repr = u64;
    const NAME: &'static str = "mac";

    fn parse(value: &str) -> Result<u64, FormatError> {
        parse_mac(value)
    }

    fn format(value: u64) -> String {
        format_mac(value)
    }

    fn domain_min() -> u64 {
        0
    }

    fn domain_max() -> u64 {
        format::MAC_MASK
    }

    fn one() -> u64 {
        1
    }

    fn wrapping_add(a: u64, b: u64) -> u64 {
        a.wrapping_add(b) & format::MAC_MASK
    }

    fn wrapping_sub(a: u64, b: u64) -> u64 {
        a.wrapping_sub(b) & format::MAC_MASK
    }

    fn sample(rng: &mut StdRng, min: u64, max: u64) -> u64 {
        rng.gen_range(min..=max)
    }
}

/// Plain unsigned integers; counters compute in 32 bits, the default random
/// range is the sample byte-sized field (0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerDomain;

impl PatternDomain for IntegerDomain {
    type Repr = u32;
    const NAME: &'static str = "integer";

    fn parse(value: &str) -> Result<u32, FormatError> {
        parse_u32(value)
    }

    fn format(value: u32) -> String {
        value.to_string()
    }

    fn domain_min() -> u32 {
        0
    }

    fn domain_max() -> u32 {
        255
    }

    fn one() -> u32 {
        1
    }

    fn wrapping_add(a: u32, b: u32) -> u32 {
        a.wrapping_add(b)
    }

    fn wrapping_sub(a: u32, b: u32) -> u32 {
        a.wrapping_sub(b)
    }

    fn sample(rng: &mut StdRng, min: u32, max: u32) -> u32 {
        rng.gen_range(min..=max)
    }
}
