//! Typed options for the TSV translator.

use serde::{Deserialize, Serialize};

/// What to do with a line that has fewer than four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Fail the read with `TsvError::MalformedLine`.
    #[default]
    Reject,
    /// Bind missing trailing fields as empty strings.
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TsvOptions {
    pub malformed_lines: MalformedLinePolicy,
}

impl TsvOptions {
    pub fn lenient() -> Self {
        Self {
            malformed_lines: MalformedLinePolicy::Lenient,
        }
    }
}
