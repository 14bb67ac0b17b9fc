//! # flowcfg-pattern — Pattern/Counter Codec
//!
//! A pattern field represents one schema field as either a literal value, a
//! list of values, an arithmetic sequence (increment/decrement), or a seeded
//! random sequence. The representation in effect is tracked by an explicit
//! [`PatternChoice`] discriminator; setting any accessor moves the
//! discriminator and discards the data of the previous representation (the
//! field's schema default is kept).
//!
//! ## Arithmetic Semantics
//!
//! Counters compute in the domain's natural unsigned integer width and wrap
//! on overflow rather than erroring: `ff:ff:ff:ff:ff:ff` + 1 is
//! `00:00:00:00:00:00`. This is load-bearing for fuzz-style address
//! generation and is pinned by tests.
//!
//! ## Random Semantics
//!
//! Random sequences are deterministic for equal `(min, max, seed, count)`.
//! The PRNG is constructed per [`Pattern::generate`] call from the seed, so
//! concurrent generation against different fields shares no mutable state.

pub mod domain;

use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowcfg_core::format::FormatError;

pub use domain::{IntegerDomain, Ipv4Domain, Ipv6Domain, MacDomain, PatternDomain};

/// A MAC-address pattern field.
pub type MacPattern = Pattern<MacDomain>;
/// An IPv4-address pattern field.
pub type Ipv4Pattern = Pattern<Ipv4Domain>;
/// An IPv6-address pattern field.
pub type Ipv6Pattern = Pattern<Ipv6Domain>;
/// An unsigned-integer pattern field.
pub type IntegerPattern = Pattern<IntegerDomain>;

/// Error materializing a pattern field into concrete values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A literal value or counter endpoint failed the domain's format check.
    #[error("{0}")]
    Format(#[from] FormatError),

    /// A random spec's minimum exceeds its maximum.
    #[error("random min {min} exceeds max {max}")]
    InvalidRange {
        /// Formatted minimum endpoint.
        min: String,
        /// Formatted maximum endpoint.
        max: String,
    },
}

/// Which representation a pattern field currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternChoice {
    /// A single literal value.
    #[default]
    Value,
    /// An explicit list of values.
    Values,
    /// An ascending arithmetic counter.
    Increment,
    /// A descending arithmetic counter.
    Decrement,
    /// A seeded random sequence.
    Random,
}

impl std::fmt::Display for PatternChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Value => "VALUE",
            Self::Values => "VALUES",
            Self::Increment => "INCREMENT",
            Self::Decrement => "DECREMENT",
            Self::Random => "RANDOM",
        };
        f.write_str(s)
    }
}

/// An arithmetic counter: `start, start±step, start±2·step, ...` for
/// `count` terms. Absent fields fall back to the field's schema default,
/// the domain's unit step, and a count of 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Counter {
    /// First value of the sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Distance between consecutive values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    /// Number of values to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Counter {
    /// Set the first value of the sequence.
    pub fn start(&mut self, start: impl Into<String>) -> &mut Self {
        self.start = Some(start.into());
        self
    }

    /// Set the distance between consecutive values.
    pub fn step(&mut self, step: impl Into<String>) -> &mut Self {
        self.step = Some(step.into());
        self
    }

    /// Set the number of values to generate.
    pub fn count(&mut self, count: u32) -> &mut Self {
        self.count = Some(count);
        self
    }
}

/// A seeded random sequence spec. Absent endpoints default to the domain's
/// full range; absent `seed`/`count` default to 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Random {
    /// Inclusive lower bound of generated values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// Inclusive upper bound of generated values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// PRNG seed; equal seeds regenerate equal sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Number of values to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Random {
    /// Set the inclusive lower bound.
    pub fn min(&mut self, min: impl Into<String>) -> &mut Self {
        self.min = Some(min.into());
        self
    }

    /// Set the inclusive upper bound.
    pub fn max(&mut self, max: impl Into<String>) -> &mut Self {
        self.max = Some(max.into());
        self
    }

    /// Set the PRNG seed.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of values to generate.
    pub fn count(&mut self, count: u32) -> &mut Self {
        self.count = Some(count);
        self
    }
}

/// A pattern field over domain `D`.
///
/// Exactly one representation is materialized at a time; switching
/// representation clears the previous one's stored data. The schema default
/// (`default_value`) survives switches and backs the `value` representation
/// when no literal has been set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound = "")]
pub struct Pattern<D: PatternDomain> {
    #[serde(default)]
    choice: PatternChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    increment: Option<Counter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decrement: Option<Counter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    random: Option<Random>,
    #[serde(skip)]
    default_value: Option<String>,
    #[serde(skip)]
    _domain: PhantomData<D>,
}

impl<D: PatternDomain> Default for Pattern<D> {
    fn default() -> Self {
        Self {
            choice: PatternChoice::Value,
            value: None,
            values: None,
            increment: None,
            decrement: None,
            random: None,
            default_value: None,
            _domain: PhantomData,
        }
    }
}

impl<D: PatternDomain> Pattern<D> {
    /// A pattern field with the domain minimum as its schema default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pattern field carrying an explicit schema default, as emitted by
    /// generated object constructors.
    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            default_value: Some(default.into()),
            ..Self::default()
        }
    }

    /// The representation currently in effect.
    pub fn choice(&self) -> PatternChoice {
        self.choice
    }

    /// The schema default backing the `value` representation.
    fn fallback(&self) -> String {
        self.default_value
            .clone()
            .unwrap_or_else(|| D::format(D::domain_min()))
    }

    /// The literal value, falling back to the schema default when unset.
    pub fn value(&self) -> String {
        self.value.clone().unwrap_or_else(|| self.fallback())
    }

    /// Set a single literal value and make it the active representation.
    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.clear_representations();
        self.choice = PatternChoice::Value;
        self.value = Some(value.into());
        self
    }

    /// The explicit value list, empty when unset.
    pub fn values(&self) -> &[String] {
        self.values.as_deref().unwrap_or(&[])
    }

    /// Set an explicit value list and make it the active representation.
    pub fn set_values<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear_representations();
        self.choice = PatternChoice::Values;
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Switch to an ascending counter, materializing a default one if absent.
    pub fn increment(&mut self) -> &mut Counter {
        if self.choice != PatternChoice::Increment {
            self.clear_representations();
            self.choice = PatternChoice::Increment;
        }
        self.increment.get_or_insert_with(Counter::default)
    }

    /// Switch to a descending counter, materializing a default one if absent.
    pub fn decrement(&mut self) -> &mut Counter {
        if self.choice != PatternChoice::Decrement {
            self.clear_representations();
            self.choice = PatternChoice::Decrement;
        }
        self.decrement.get_or_insert_with(Counter::default)
    }

    /// Switch to a random sequence, materializing a default spec if absent.
    pub fn random(&mut self) -> &mut Random {
        if self.choice != PatternChoice::Random {
            self.clear_representations();
            self.choice = PatternChoice::Random;
        }
        self.random.get_or_insert_with(Random::default)
    }

    fn clear_representations(&mut self) {
        self.value = None;
        self.values = None;
        self.increment = None;
        self.decrement = None;
        self.random = None;
    }

    /// Materialize the concrete value sequence for the active representation.
    ///
    /// Literals and endpoints are format-checked before use; arithmetic wraps
    /// at the domain width; random draws come from a PRNG seeded for this
    /// call only.
    pub fn generate(&self) -> Result<Vec<String>, PatternError> {
        match self.choice {
            PatternChoice::Value => {
                let value = self.value();
                D::parse(&value)?;
                Ok(vec![value])
            }
            PatternChoice::Values => {
                let values = self.values();
                for value in values {
                    D::parse(value)?;
                }
                Ok(values.to_vec())
            }
            PatternChoice::Increment => self.generate_counter(&self.increment, true),
            PatternChoice::Decrement => self.generate_counter(&self.decrement, false),
            PatternChoice::Random => self.generate_random(),
        }
    }

    fn counter_terms(&self, counter: &Option<Counter>) -> (String, String, u32) {
        let counter = counter.clone().unwrap_or_default();
        let start = counter.start.unwrap_or_else(|| self.fallback());
        let step = counter.step.unwrap_or_else(|| D::format(D::one()));
        (start, step, counter.count.unwrap_or(1))
    }

    fn generate_counter(
        &self,
        counter: &Option<Counter>,
        ascending: bool,
    ) -> Result<Vec<String>, PatternError> {
        let (start, step, count) = self.counter_terms(counter);
        let start = D::parse(&start)?;
        let step = D::parse(&step)?;
        let mut out = Vec::with_capacity(count as usize);
        let mut current = start;
        for _ in 0..count {
            out.push(D::format(current));
            current = if ascending {
                D::wrapping_add(current, step)
            } else {
                D::wrapping_sub(current, step)
            };
        }
        Ok(out)
    }

    fn generate_random(&self) -> Result<Vec<String>, PatternError> {
        let spec = self.random.clone().unwrap_or_default();
        let min = match &spec.min {
            Some(s) => D::parse(s)?,
            None => D::domain_min(),
        };
        let max = match &spec.max {
            Some(s) => D::parse(s)?,
            None => D::domain_max(),
        };
        if min > max {
            return Err(PatternError::InvalidRange {
                min: D::format(min),
                max: D::format(max),
            });
        }
        let count = spec.count.unwrap_or(1);
        let mut rng = StdRng::seed_from_u64(spec.seed.unwrap_or(1));
        Ok((0..count).map(|_| D::format(D::sample(&mut rng, min, max))).collect())
    }

    /// Format-check the active representation, returning path-qualified
    /// error strings for the validation engine to aggregate.
    ///
    /// A list reports all failing indices in one message rather than
    /// stopping at the first.
    pub fn check(&self, path: &str) -> Vec<String> {
        let mut errors = Vec::new();
        match self.choice {
            PatternChoice::Value => {
                if let Err(e) = D::parse(&self.value()) {
                    errors.push(format!("{e} on {path}.value"));
                }
            }
            PatternChoice::Values => {
                let bad: Vec<String> = self
                    .values()
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| D::parse(v).is_err())
                    .map(|(i, _)| i.to_string())
                    .collect();
                if !bad.is_empty() {
                    errors.push(format!(
                        "Invalid {} addresses at indices {} on {path}.values",
                        D::NAME,
                        bad.join(","),
                    ));
                }
            }
            PatternChoice::Increment => {
                self.check_counter(&self.increment, path, "increment", &mut errors);
            }
            PatternChoice::Decrement => {
                self.check_counter(&self.decrement, path, "decrement", &mut errors);
            }
            PatternChoice::Random => {
                let spec = self.random.clone().unwrap_or_default();
                if let Some(min) = &spec.min {
                    if let Err(e) = D::parse(min) {
                        errors.push(format!("{e} on {path}.random.min"));
                    }
                }
                if let Some(max) = &spec.max {
                    if let Err(e) = D::parse(max) {
                        errors.push(format!("{e} on {path}.random.max"));
                    }
                }
                if errors.is_empty() {
                    if let Err(e) = self.generate_random() {
                        errors.push(format!("{e} on {path}.random"));
                    }
                }
            }
        }
        errors
    }

    fn check_counter(
        &self,
        counter: &Option<Counter>,
        path: &str,
        kind: &str,
        errors: &mut Vec<String>,
    ) {
        let (start, step, _) = self.counter_terms(counter);
        if let Err(e) = D::parse(&start) {
            errors.push(format!("{e} on {path}.{kind}.start"));
        }
        if let Err(e) = D::parse(&step) {
            errors.push(format!("{e} on {path}.{kind}.step"));
        }
    }
}
