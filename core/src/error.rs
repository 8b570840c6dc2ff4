//! Error types for option-table generation.
//!
//! Covers every way a generation run can fail: record-store precondition
//! violations, ambiguous option definitions, record file validation, and
//! I/O or serialization failures while loading inputs.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that can occur while loading records or generating a table.
#[derive(Debug, Error)]
pub enum TableGenError {
    /// Two options cannot be told apart by the matcher.
    #[error("option '{first}' is equivalent to '{second}' (same name, precedence and prefixes)")]
    AmbiguousOption {
        /// Record name of the first conflicting definition.
        first: String,
        /// Record name of the other definition.
        second: String,
    },

    /// A required field is not set on a record.
    #[error("record '{record}' has no value for required field '{field}'")]
    MissingField { record: String, field: String },

    /// A field holds a value of the wrong shape.
    #[error("field '{field}' of record '{record}' is not {expected}")]
    FieldType {
        record: String,
        field: String,
        expected: &'static str,
    },

    /// A reference names a record that does not exist.
    #[error("unknown record: {0}")]
    UnknownRecord(String),

    /// A reference points at a record of the wrong class.
    #[error("record '{record}' is a {found}, expected {expected}")]
    WrongClass {
        record: String,
        found: String,
        expected: &'static str,
    },

    /// The record file failed structural validation.
    #[error("invalid record file: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`TableGenError`].
pub type Result<T> = std::result::Result<T, TableGenError>;
