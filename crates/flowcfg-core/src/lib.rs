//! # flowcfg-core — Foundational Types for the flowcfg Runtime
//!
//! This crate is the bedrock of the flowcfg runtime. It defines the address
//! format validators and parse/format helpers that every other crate in the
//! workspace relies on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Pure validators.** Format checks are free functions with no state and
//!    no allocation beyond the error path. The pattern codec and the
//!    validation engine both call the same functions, so a value accepted in
//!    one place is accepted everywhere.
//!
//! 2. **Positional errors.** MAC and IPv4 failures name the offending value
//!    and the 1-indexed octet that broke, so aggregated validation output is
//!    actionable without re-parsing.
//!
//! 3. **Integer-domain parsing.** Every address family has a natural unsigned
//!    integer representation (IPv4 → u32, MAC → 48-bit u64, IPv6 → u128).
//!    Counter arithmetic in `flowcfg-pattern` happens in that representation,
//!    so parse/format round-tripping lives here next to the validators.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `flowcfg-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod format;

pub use format::{
    format_ipv4, format_ipv6, format_mac, parse_ipv4, parse_ipv6, parse_mac, parse_u32,
    validate_hex, validate_ipv4, validate_ipv6, validate_mac, validate_oid, FormatError,
};
