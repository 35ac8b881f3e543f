//! Signature build options
//!
//! Options are plain data with serde defaults, so they can be embedded in a
//! host application's own config file and handed over as JSON.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_SIGNATURE_NAME: &str = "DynamicSignature";

/// Options controlling how specs are assembled into a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Name given to the built signature
    pub signature_name: String,

    /// Split a single bare-string spec on commas into several fields.
    ///
    /// Off by default: `"a, b"` is one field named `a, b`.
    pub legacy_comma_split: bool,

    /// Let a later field replace an earlier one with the same name instead
    /// of failing with `DuplicateFieldError`.
    pub allow_duplicate_names: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            signature_name: DEFAULT_SIGNATURE_NAME.to_string(),
            legacy_comma_split: false,
            allow_duplicate_names: false,
        }
    }
}

impl BuildOptions {
    /// Load options from a JSON object; missing keys take their defaults.
    ///
    /// # Errors
    /// `ConfigError` for invalid JSON, wrong value types, or unknown keys.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))
    }
}
