//! Error types for defs → CGF translation
//!
//! Expansion failures are deterministic input-validation errors raised at
//! the granularity of one template; the document layer wraps them together
//! with the YAML and file I/O failures of the outer boundary.

use thiserror::Error;

/// Main error type for a document translation run
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Expansion error: {0}")]
    Expand(#[from] ExpandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Input document is not a mapping of coverpoints")]
    NotAMapping,
}

/// Errors raised while expanding a single template
///
/// All variants are deterministic input-validation failures; none is
/// transient or retryable. Failure aborts expansion of the template that
/// produced it.
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Malformed template '{template}': unbalanced or stray braces remain after tokenizing")]
    MalformedTemplate { template: String },

    #[error("Invalid range '{text}': expected '{{start ... end}}' with integer start <= end")]
    InvalidRange { text: String },

    #[error("Invalid list '{text}': element '{element}' is not an integer")]
    InvalidList { text: String, element: String },

    #[error("Nested expression '{text}' has no trailing operation (expected one of + - * / << >>)")]
    MissingOperation { text: String },

    #[error("Invalid operand in '{text}': {reason}")]
    InvalidOperand { text: String, reason: String },

    #[error("Back-reference ${index} exceeds the {available} enumerable placeholder(s) in the template")]
    DanglingBackReference { index: usize, available: usize },
}
