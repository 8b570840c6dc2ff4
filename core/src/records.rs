//! Record store capability and its in-memory implementation.
//!
//! The generator never touches a concrete record format. It reads typed
//! fields through [`RecordStore`], which exposes records by class and a small
//! set of typed getters. [`MemoryStore`] implements the trait over records
//! built in code or loaded from a JSON/YAML record file.
//!
//! # Record file format
//!
//! ```json
//! { "records": [
//!     { "name": "KIND_FLAG", "class": "OptionKind",
//!       "fields": { "Name": "KIND_FLAG", "Precedence": 1, "Sentinel": false } },
//!     { "name": "help", "class": "Option",
//!       "fields": { "Name": "help", "Kind": { "def": "KIND_FLAG" },
//!                   "Prefixes": ["--"], "Flags": [], "NumArgs": 0 } }
//! ] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableGenError};

/// Class name of option kind records.
pub const KIND_CLASS: &str = "OptionKind";
/// Class name of option group records.
pub const GROUP_CLASS: &str = "OptionGroup";
/// Class name of option records.
pub const OPTION_CLASS: &str = "Option";

/// Opaque handle to a record inside a [`RecordStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    /// Position of the record in definition order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Value of a single record field.
///
/// Serialized untagged, so a record file spells values naturally:
/// `null`, `true`, `3`, `"text"`, `["-", "--"]` or `{ "def": "NAME" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicitly unset (`null`).
    Unset,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
    /// Reference to another record by name.
    Ref { def: String },
}

impl FieldValue {
    /// Builds a reference to the record called `name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref { def: name.into() }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Str(_) => "a string",
            Self::List(_) => "a list of strings",
            Self::Ref { .. } => "a record reference",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// A named, classed bag of fields.
///
/// # Examples
///
/// ```
/// use opt_table_core::{FieldValue, Record};
///
/// let record = Record::new("help", "Option")
///     .with("Name", "help")
///     .with("Prefixes", vec!["-", "--"])
///     .with("Kind", FieldValue::reference("KIND_FLAG"));
/// assert_eq!(record.fields.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record name, also the default identifier.
    pub name: String,
    /// Record class (`OptionKind`, `OptionGroup`, `Option`, ...).
    pub class: String,
    /// Field values keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no fields.
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }
}

/// Read-only access to externally supplied records.
///
/// Implementors provide enumeration, naming and raw field lookup; the typed
/// getters are provided on top of those and report precondition violations
/// as [`TableGenError`]s.
pub trait RecordStore {
    /// Records of `class`, in definition order.
    fn records_of_class(&self, class: &str) -> Vec<RecordId>;

    /// Name of a record.
    fn record_name(&self, id: RecordId) -> &str;

    /// Class of a record.
    fn record_class(&self, id: RecordId) -> &str;

    /// Finds a record by name.
    fn lookup(&self, name: &str) -> Option<RecordId>;

    /// Raw value of a field, `None` when the record does not mention it.
    fn value(&self, id: RecordId, field: &str) -> Option<&FieldValue>;

    /// Required string field.
    fn get_string(&self, id: RecordId, field: &str) -> Result<String> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Err(missing(self, id, field)),
            Some(FieldValue::Str(s)) => Ok(s.clone()),
            Some(_) => Err(wrong_type(self, id, field, "a string")),
        }
    }

    /// Optional string field; absent and `null` both read as `None`.
    fn get_optional_string(&self, id: RecordId, field: &str) -> Result<Option<String>> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Ok(None),
            Some(FieldValue::Str(s)) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type(self, id, field, "a string")),
        }
    }

    /// Required ordered list of strings.
    fn get_ordered_strings(&self, id: RecordId, field: &str) -> Result<Vec<String>> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Err(missing(self, id, field)),
            Some(FieldValue::List(items)) => Ok(items.clone()),
            Some(_) => Err(wrong_type(self, id, field, "a list of strings")),
        }
    }

    /// Optional reference to another record.
    fn get_reference(&self, id: RecordId, field: &str) -> Result<Option<RecordId>> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Ok(None),
            Some(FieldValue::Ref { def }) => self
                .lookup(def)
                .map(Some)
                .ok_or_else(|| TableGenError::UnknownRecord(def.clone())),
            Some(_) => Err(wrong_type(self, id, field, "a record reference")),
        }
    }

    /// Required integer field.
    fn get_int(&self, id: RecordId, field: &str) -> Result<i64> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Err(missing(self, id, field)),
            Some(FieldValue::Int(n)) => Ok(*n),
            Some(_) => Err(wrong_type(self, id, field, "an integer")),
        }
    }

    /// Required boolean field.
    fn get_bool(&self, id: RecordId, field: &str) -> Result<bool> {
        match self.value(id, field) {
            None | Some(FieldValue::Unset) => Err(missing(self, id, field)),
            Some(FieldValue::Bool(b)) => Ok(*b),
            Some(_) => Err(wrong_type(self, id, field, "a boolean")),
        }
    }
}

fn missing<S: RecordStore + ?Sized>(store: &S, id: RecordId, field: &str) -> TableGenError {
    TableGenError::MissingField {
        record: store.record_name(id).to_string(),
        field: field.to_string(),
    }
}

fn wrong_type<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    field: &str,
    expected: &'static str,
) -> TableGenError {
    TableGenError::FieldType {
        record: store.record_name(id).to_string(),
        field: field.to_string(),
        expected,
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    records: Vec<Record>,
}

/// In-memory [`RecordStore`] that keeps records in definition order.
///
/// # Examples
///
/// ```
/// use opt_table_core::{MemoryStore, Record, RecordStore};
///
/// let mut store = MemoryStore::new();
/// store.push(Record::new("grp_input", "OptionGroup").with("Name", "Input"));
///
/// let groups = store.records_of_class("OptionGroup");
/// assert_eq!(groups.len(), 1);
/// assert_eq!(store.get_string(groups[0], "Name").unwrap(), "Input");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    by_name: HashMap<String, RecordId>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records in definition order.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.push(record);
        }
        store
    }

    /// Appends a record and returns its handle.
    ///
    /// When a name repeats, lookups keep resolving to the first record;
    /// [`validate_store`](crate::validate_store) reports the duplicate.
    pub fn push(&mut self, record: Record) -> RecordId {
        let id = RecordId(self.records.len());
        self.by_name.entry(record.name.clone()).or_insert(id);
        self.records.push(record);
        id
    }

    /// Parses a JSON record file.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: RecordFile = serde_json::from_str(raw)?;
        Ok(Self::from_records(file.records))
    }

    /// Parses a YAML record file.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: RecordFile = serde_yaml::from_str(raw)?;
        Ok(Self::from_records(file.records))
    }

    /// Loads a record file, choosing YAML for `.yaml`/`.yml` and JSON
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](TableGenError::Io) if the file cannot be read and
    /// [`Json`](TableGenError::Json) or [`Yaml`](TableGenError::Yaml) if it
    /// does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            _ => Self::from_json_str(&raw),
        }
    }

    /// Serializes the store back into the JSON record file format.
    pub fn to_json_string(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            records: &'a [Record],
        }
        Ok(serde_json::to_string_pretty(&Borrowed {
            records: &self.records,
        })?)
    }

    /// All records in definition order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn records_of_class(&self, class: &str) -> Vec<RecordId> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.class == class)
            .map(|(i, _)| RecordId(i))
            .collect()
    }

    fn record_name(&self, id: RecordId) -> &str {
        &self.records[id.0].name
    }

    fn record_class(&self, id: RecordId) -> &str {
        &self.records[id.0].class
    }

    fn lookup(&self, name: &str) -> Option<RecordId> {
        self.by_name.get(name).copied()
    }

    fn value(&self, id: RecordId, field: &str) -> Option<&FieldValue> {
        self.records[id.0].fields.get(field)
    }
}
