//! # Serialization Facade
//!
//! Every exchangeable object gets four codecs with identical semantics:
//! compact JSON, YAML, a pretty-printed debug text tree, and CBOR binary.
//!
//! The `to_*` marshal paths validate before encoding and surface validation
//! failures as the call's error; the `encode_*` paths skip validation for
//! call sites that already validated. Decoding parses into a transient
//! value first, so the receiving node is left untouched on failure, and
//! replaces node state wholesale (never merged) on success.
//!
//! Unknown field keys are a distinct failure class from structurally
//! malformed input: every model struct is `deny_unknown_fields`, and the
//! serde error text is classified into [`CodecError::InvalidKey`] versus
//! [`CodecError::Unmarshal`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::validate::ValidationError;

/// Error from the serialization facade.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Validation ran before encoding and failed.
    #[error("validation failed:\n{0}")]
    Validation(#[from] ValidationError),

    /// The input carries a field key the schema does not declare.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Structurally malformed input (wrong types, missing separators, bad
    /// framing).
    #[error("unmarshal error: {0}")]
    Unmarshal(String),

    /// The object could not be encoded.
    #[error("marshal error: {0}")]
    Marshal(String),
}

/// Split serde's flat error text into the unknown-key versus structural
/// classes. serde reports rejected keys as "unknown field", for every
/// self-describing format we use.
fn classify(message: String) -> CodecError {
    if message.contains("unknown field") {
        CodecError::InvalidKey(message)
    } else {
        CodecError::Unmarshal(message)
    }
}

/// Validation hook the facade runs on the marshal paths, plus the warning
/// reset applied after a successful decode.
pub trait Validated {
    /// Run a full validation pass; the root object refreshes its warning
    /// store as a side effect.
    fn validate(&mut self) -> Result<(), ValidationError>;

    /// Drop any warnings carried from a previous pass. Decode calls this
    /// after replacing node state.
    fn reset_warnings(&mut self) {}
}

/// The four-format marshal/unmarshal surface.
///
/// Blanket-implemented for every serializable, validatable model type.
pub trait WireObject: Serialize + DeserializeOwned + Validated + Sized {
    /// Validate, then encode as compact JSON.
    fn to_json(&mut self) -> Result<String, CodecError> {
        self.validate()?;
        self.encode_json()
    }

    /// Validate, then encode as YAML.
    fn to_yaml(&mut self) -> Result<String, CodecError> {
        self.validate()?;
        self.encode_yaml()
    }

    /// Validate, then encode as the pretty-printed debug text tree.
    fn to_text(&mut self) -> Result<String, CodecError> {
        self.validate()?;
        self.encode_text()
    }

    /// Validate, then encode as CBOR binary.
    fn to_binary(&mut self) -> Result<Vec<u8>, CodecError> {
        self.validate()?;
        self.encode_binary()
    }

    /// Encode as compact JSON without validating.
    fn encode_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::Marshal(e.to_string()))
    }

    /// Encode as YAML without validating.
    fn encode_yaml(&self) -> Result<String, CodecError> {
        serde_yaml::to_string(self).map_err(|e| CodecError::Marshal(e.to_string()))
    }

    /// Encode as the debug text tree without validating.
    fn encode_text(&self) -> Result<String, CodecError> {
        serde_json::to_string_pretty(self).map_err(|e| CodecError::Marshal(e.to_string()))
    }

    /// Encode as CBOR binary without validating.
    fn encode_binary(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(self, &mut out)
            .map_err(|e| CodecError::Marshal(e.to_string()))?;
        Ok(out)
    }

    /// Replace this node's state from compact JSON.
    fn from_json(&mut self, data: &str) -> Result<(), CodecError> {
        let parsed: Self = serde_json::from_str(data).map_err(|e| classify(e.to_string()))?;
        *self = parsed;
        self.reset_warnings();
        Ok(())
    }

    /// Replace this node's state from YAML.
    fn from_yaml(&mut self, data: &str) -> Result<(), CodecError> {
        let parsed: Self = serde_yaml::from_str(data).map_err(|e| classify(e.to_string()))?;
        *self = parsed;
        self.reset_warnings();
        Ok(())
    }

    /// Replace this node's state from the debug text tree.
    fn from_text(&mut self, data: &str) -> Result<(), CodecError> {
        self.from_json(data)
    }

    /// Replace this node's state from CBOR binary.
    fn from_binary(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let parsed: Self =
            ciborium::de::from_reader(data).map_err(|e| classify(e.to_string()))?;
        *self = parsed;
        self.reset_warnings();
        Ok(())
    }
}

impl<T: Serialize + DeserializeOwned + Validated + Sized> WireObject for T {}
