//! Structural validation of record files.
//!
//! Catches the problems an upstream schema checker would reject before the
//! generator reads a record: duplicate names, identifiers the downstream
//! consumer cannot spell, dangling references, references to the wrong
//! class, and negative argument counts.
//!
//! # Examples
//!
//! ```
//! use opt_table_core::*;
//!
//! let store = MemoryStore::from_records([
//!     Record::new("grp", "OptionGroup").with("Name", "Group"),
//! ]);
//! assert!(validate_store(&store).is_empty());
//!
//! let bad = MemoryStore::from_records([
//!     Record::new("not an identifier", "OptionGroup").with("Name", "Group"),
//! ]);
//! assert!(!validate_store(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::{Result, TableGenError};
use crate::records::{
    FieldValue, GROUP_CLASS, KIND_CLASS, MemoryStore, OPTION_CLASS, Record, RecordStore,
};

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile")
});

/// Record file validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two records share a name.
    #[error("duplicate record: {0}")]
    DuplicateRecord(String),
    /// A record name, `EnumName` or flag is not a C identifier.
    #[error("invalid identifier in record '{record}': {identifier}")]
    InvalidIdentifier { record: String, identifier: String },
    /// A reference names a record that does not exist.
    #[error("record '{record}' field '{field}' references unknown record '{target}'")]
    DanglingReference {
        record: String,
        field: String,
        target: String,
    },
    /// A reference points at a record of the wrong class.
    #[error("record '{record}' field '{field}' must reference an {expected}, found '{target}'")]
    ReferenceClass {
        record: String,
        field: String,
        target: String,
        expected: &'static str,
    },
    /// `NumArgs` is below zero.
    #[error("record '{record}' has negative NumArgs: {value}")]
    NegativeArgCount { record: String, value: i64 },
}

/// Validates every record in a store.
///
/// Collects every problem in record order; an empty vector means the store
/// is safe to hand to the generator. A repeated record name is reported once
/// per extra definition, and those extra definitions are not checked further
/// since lookups never reach them.
pub fn validate_store(store: &MemoryStore) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in store.records() {
        if !seen.insert(record.name.as_str()) {
            errors.push(ValidationError::DuplicateRecord(record.name.clone()));
            continue;
        }
        errors.extend(validate_record(store, record));
    }

    errors
}

/// Like [`validate_store`], but as a [`Result`] for `?` chains.
///
/// # Errors
///
/// Returns [`TableGenError::Validation`] carrying every problem found.
pub fn ensure_valid(store: &MemoryStore) -> Result<()> {
    let errors = validate_store(store);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TableGenError::Validation(errors))
    }
}

fn validate_record(store: &MemoryStore, record: &Record) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_identifier(&record.name) {
        errors.push(invalid_identifier(record, &record.name));
    }
    if let Some(FieldValue::Str(enum_name)) = record.fields.get("EnumName") {
        if !is_identifier(enum_name) {
            errors.push(invalid_identifier(record, enum_name));
        }
    }

    let expectations: &[(&str, &'static str)] = match record.class.as_str() {
        OPTION_CLASS => &[
            ("Kind", KIND_CLASS),
            ("Group", GROUP_CLASS),
            ("Alias", OPTION_CLASS),
        ],
        GROUP_CLASS => &[("Group", GROUP_CLASS)],
        _ => &[],
    };
    for &(field, expected) in expectations {
        let Some(FieldValue::Ref { def }) = record.fields.get(field) else {
            continue;
        };
        match store.lookup(def).map(|id| store.record_class(id)) {
            None => errors.push(ValidationError::DanglingReference {
                record: record.name.clone(),
                field: field.to_string(),
                target: def.clone(),
            }),
            Some(class) if class != expected => errors.push(ValidationError::ReferenceClass {
                record: record.name.clone(),
                field: field.to_string(),
                target: def.clone(),
                expected,
            }),
            Some(_) => {}
        }
    }

    if record.class == OPTION_CLASS {
        if let Some(FieldValue::List(flags)) = record.fields.get("Flags") {
            errors.extend(
                flags
                    .iter()
                    .filter(|flag| !is_identifier(flag))
                    .map(|flag| invalid_identifier(record, flag)),
            );
        }
        if let Some(&FieldValue::Int(value)) = record.fields.get("NumArgs") {
            if value < 0 {
                errors.push(ValidationError::NegativeArgCount {
                    record: record.name.clone(),
                    value,
                });
            }
        }
    }

    errors
}

fn is_identifier(candidate: &str) -> bool {
    IDENTIFIER_RE.is_match(candidate)
}

fn invalid_identifier(record: &Record, identifier: &str) -> ValidationError {
    ValidationError::InvalidIdentifier {
        record: record.name.clone(),
        identifier: identifier.to_string(),
    }
}
