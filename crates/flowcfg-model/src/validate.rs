//! # Validation Engine
//!
//! Depth-first walk over a configuration tree, enforcing required-ness,
//! numeric/length ranges, format rules, uniqueness and cross-field
//! references, while collecting non-fatal deprecation/under-review warnings.
//!
//! ## Context Lifecycle
//!
//! A [`ValidationContext`] is created fresh for every validate/serialize
//! call and discarded afterwards — there is no process-wide validation
//! state, so concurrent validation of independent trees cannot leak
//! messages into each other. Uniqueness and cross-reference checks are
//! scoped to the one root the context was created for.
//!
//! ## Ordering
//!
//! Nodes check their own fields in declaration order, then recurse into
//! nested objects and list elements in index order. Aggregated output is
//! therefore deterministic and suitable for golden-file comparison.

use std::collections::HashMap;
use std::fmt::Display;

use thiserror::Error;

use flowcfg_core::format::FormatError;

/// Aggregate of every violation found in one validation pass.
///
/// `Display` renders one message per line, preserving walk order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", messages.join("\n"))]
pub struct ValidationError {
    /// Individual violation messages in walk order.
    pub messages: Vec<String>,
}

/// A node registered under a uniqueness key, available for cross-field
/// reference resolution.
#[derive(Debug, Clone)]
struct Dependency {
    type_name: &'static str,
    field: &'static str,
    value: String,
}

/// A pending cross-field ("x-constraint") reference, resolved against the
/// dependency set once the whole tree has been walked.
#[derive(Debug, Clone)]
struct Constraint {
    value: String,
    target_type: &'static str,
    target_field: &'static str,
}

/// Per-call state for one validation/serialization pass.
#[derive(Debug)]
pub struct ValidationContext {
    /// Whether uniqueness and cross-reference checks run. Disabled for
    /// purely syntactic validation.
    resolve: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    /// Uniqueness registry: "Type.field" domain → value → first path seen.
    unique: HashMap<String, HashMap<String, String>>,
    /// Every uniquely-keyed node seen during the walk, in walk order.
    deps: Vec<Dependency>,
    constraints: Vec<Constraint>,
}

impl ValidationContext {
    /// A fresh context. `resolve` gates uniqueness and cross-reference
    /// evaluation.
    pub fn new(resolve: bool) -> Self {
        Self {
            resolve,
            errors: Vec::new(),
            warnings: Vec::new(),
            unique: HashMap::new(),
            deps: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Append a raw violation message.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Append a non-fatal warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Required-field check: absent fields name the field and the interface.
    pub fn require(&mut self, present: bool, field: &str, interface: &str) {
        if !present {
            self.errors
                .push(format!("{field} is required field on interface {interface}"));
        }
    }

    /// Numeric bounds check with a fully parameterized message.
    pub fn check_range<T>(&mut self, value: T, min: T, max: T, field: &str, interface: &str)
    where
        T: PartialOrd + Display,
    {
        if value < min || value > max {
            self.errors.push(format!(
                "{field} on {interface} should be between {min} and {max}, got {value}"
            ));
        }
    }

    /// String-length bounds check with the observed length in the message.
    pub fn check_length(&mut self, value: &str, min: usize, max: usize, field: &str, interface: &str) {
        let len = value.len();
        if len < min || len > max {
            self.errors.push(format!(
                "length of {field} on {interface} should be between {min} and {max}, got {len}"
            ));
        }
    }

    /// Record a format-validator failure against `path.field`.
    pub fn check_format(&mut self, result: Result<(), FormatError>, path: &str, field: &str) {
        if let Err(e) = result {
            self.errors.push(format!("{e} on {path}.{field}"));
        }
    }

    /// Record a deprecated-field warning. Fires on every pass that touches
    /// the field, regardless of validation outcome.
    pub fn deprecated(&mut self, field: &str, interface: &str, message: &str) {
        self.warnings.push(format!(
            "{field} property in schema {interface} is deprecated, {message}"
        ));
    }

    /// Record an under-review-field warning.
    pub fn under_review(&mut self, field: &str, interface: &str, message: &str) {
        self.warnings.push(format!(
            "{field} property in schema {interface} is under review, {message}"
        ));
    }

    /// Register a node under a uniqueness key and flag duplicates within
    /// this root's scope. The node also becomes a resolution target for
    /// cross-field references.
    pub fn register_unique(
        &mut self,
        type_name: &'static str,
        field: &'static str,
        value: &str,
        path: &str,
    ) {
        if !self.resolve {
            return;
        }
        self.deps.push(Dependency {
            type_name,
            field,
            value: value.to_string(),
        });
        let domain = self.unique.entry(format!("{type_name}.{field}")).or_default();
        if domain.contains_key(value) {
            self.errors.push(format!("{field} with {value} already exists"));
        } else {
            domain.insert(value.to_string(), path.to_string());
        }
    }

    /// Defer a cross-field reference for resolution after the walk.
    pub fn constrain(&mut self, value: &str, target_type: &'static str, target_field: &'static str) {
        if !self.resolve {
            return;
        }
        self.constraints.push(Constraint {
            value: value.to_string(),
            target_type,
            target_field,
        });
    }

    /// Resolve deferred cross-references and close the pass, yielding the
    /// aggregate outcome and the collected warnings.
    pub fn finish(mut self) -> (Result<(), ValidationError>, Vec<String>) {
        let constraints = std::mem::take(&mut self.constraints);
        for c in constraints {
            let satisfied = self.deps.iter().any(|d| {
                d.type_name == c.target_type && d.field == c.target_field && d.value == c.value
            });
            if !satisfied {
                self.errors.push(format!(
                    "{} is not a valid {}.{} type",
                    c.value, c.target_type, c.target_field
                ));
            }
        }
        let result = if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                messages: self.errors,
            })
        };
        (result, self.warnings)
    }
}

/// A node in the configuration tree that knows how to check itself.
///
/// Implementations check own fields first, then recurse into children in
/// declaration order. They must never panic; every violation goes through
/// the context.
pub trait Validate {
    /// Check this node and its subtree, appending to the context.
    fn check(&self, ctx: &mut ValidationContext, path: &str);
}

/// Run one full validation pass over `node`, with uniqueness and
/// cross-reference resolution enabled.
pub fn validate<T: Validate>(node: &T, root_path: &str) -> (Result<(), ValidationError>, Vec<String>) {
    let mut ctx = ValidationContext::new(true);
    node.check(&mut ctx, root_path);
    ctx.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        name: Option<String>,
    }

    impl Validate for Leaf {
        fn check(&self, ctx: &mut ValidationContext, path: &str) {
            ctx.require(self.name.is_some(), "name", "Leaf");
            if let Some(name) = &self.name {
                ctx.register_unique("Leaf", "name", name, path);
            }
        }
    }

    #[test]
    fn require_names_field_and_interface() {
        let (result, _) = validate(&Leaf { name: None }, "leaf");
        let err = result.unwrap_err();
        assert_eq!(err.messages, vec!["name is required field on interface Leaf"]);
    }

    #[test]
    fn duplicate_keys_are_flagged_once_registered() {
        let mut ctx = ValidationContext::new(true);
        Leaf { name: Some("a".into()) }.check(&mut ctx, "l[0]");
        Leaf { name: Some("a".into()) }.check(&mut ctx, "l[1]");
        let (result, _) = ctx.finish();
        assert_eq!(result.unwrap_err().messages, vec!["name with a already exists"]);
    }

    #[test]
    fn uniqueness_skipped_without_resolve() {
        let mut ctx = ValidationContext::new(false);
        Leaf { name: Some("a".into()) }.check(&mut ctx, "l[0]");
        Leaf { name: Some("a".into()) }.check(&mut ctx, "l[1]");
        let (result, _) = ctx.finish();
        assert!(result.is_ok());
    }

    #[test]
    fn constraint_resolves_against_registered_deps() {
        let mut ctx = ValidationContext::new(true);
        ctx.register_unique("Leaf", "name", "a", "l[0]");
        ctx.constrain("a", "Leaf", "name");
        ctx.constrain("b", "Leaf", "name");
        let (result, _) = ctx.finish();
        assert_eq!(
            result.unwrap_err().messages,
            vec!["b is not a valid Leaf.name type"]
        );
    }

    #[test]
    fn display_joins_messages_with_newlines() {
        let err = ValidationError {
            messages: vec!["one".into(), "two".into()],
        };
        assert_eq!(err.to_string(), "one\ntwo");
    }

    #[test]
    fn range_and_length_messages_carry_observed_values() {
        let mut ctx = ValidationContext::new(true);
        ctx.check_range(9001u32, 64u32, 9000u32, "mtu", "Ethernet");
        ctx.check_length("", 1, 128, "description", "Flow");
        let (result, _) = ctx.finish();
        let messages = result.unwrap_err().messages;
        assert_eq!(
            messages[0],
            "mtu on Ethernet should be between 64 and 9000, got 9001"
        );
        assert_eq!(
            messages[1],
            "length of description on Flow should be between 1 and 128, got 0"
        );
    }

    #[test]
    fn warnings_do_not_fail_validation() {
        let mut ctx = ValidationContext::new(true);
        ctx.deprecated("description", "Flow", "use name instead");
        let (result, warnings) = ctx.finish();
        assert!(result.is_ok());
        assert_eq!(
            warnings,
            vec!["description property in schema Flow is deprecated, use name instead"]
        );
    }
}
