//! Typed view over option, group and kind records.
//!
//! Reads the fields the generator needs out of a [`RecordStore`] and
//! resolves references into the identifiers the emitted table uses. The
//! records themselves are never modified.

use tracing::warn;

use crate::error::{Result, TableGenError};
use crate::records::{GROUP_CLASS, KIND_CLASS, OPTION_CLASS, RecordId, RecordStore};

/// Kind of an option (flag, joined, separate, input, unknown, ...).
///
/// # Examples
///
/// ```
/// use opt_table_core::OptionKind;
///
/// let input = OptionKind::sentinel("KIND_INPUT", 1);
/// assert!(input.sentinel);
/// assert!(!OptionKind::new("KIND_FLAG", 4).sentinel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionKind {
    /// Name emitted as the kind designator.
    pub name: String,
    /// Match precedence; compared ascending.
    pub precedence: i64,
    /// Structural marker (input file, unknown argument) rather than a switch.
    pub sentinel: bool,
}

impl OptionKind {
    /// Creates a regular (non-sentinel) kind.
    pub fn new(name: &str, precedence: i64) -> Self {
        Self {
            name: name.to_string(),
            precedence,
            sentinel: false,
        }
    }

    /// Creates a sentinel kind.
    pub fn sentinel(name: &str, precedence: i64) -> Self {
        Self {
            sentinel: true,
            ..Self::new(name, precedence)
        }
    }
}

/// An option group record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    /// Name of the source record.
    pub record: String,
    /// Group name as shown to users.
    pub name: String,
    /// Identifier override.
    pub enum_name: Option<String>,
    /// Identifier of the enclosing group.
    pub parent: Option<String>,
    pub help_text: Option<String>,
}

impl OptionGroup {
    /// Creates a group whose record name and display name are `name`.
    pub fn new(name: &str) -> Self {
        Self {
            record: name.to_string(),
            name: name.to_string(),
            enum_name: None,
            parent: None,
            help_text: None,
        }
    }

    /// Identifier used in the emitted table.
    pub fn identifier(&self) -> &str {
        self.enum_name.as_deref().unwrap_or(&self.record)
    }
}

/// An option record with every reference resolved.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptionDef, OptionKind};
///
/// let opt = OptionDef::new("I", OptionKind::new("KIND_JOINED", 2))
///     .with_prefixes(&["-"])
///     .with_num_args(1)
///     .with_help_text("Add directory to include search path");
/// assert_eq!(opt.identifier(), "I");
/// assert_eq!(opt.prefixes, vec!["-".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    /// Name of the source record.
    pub record: String,
    /// Option spelling without prefix.
    pub name: String,
    /// Identifier override.
    pub enum_name: Option<String>,
    pub kind: OptionKind,
    /// Accepted prefixes, in declaration order.
    pub prefixes: Vec<String>,
    /// Identifier of the owning group.
    pub group: Option<String>,
    /// Identifier of the aliased option.
    pub alias: Option<String>,
    /// Flag identifiers, in declaration order.
    pub flags: Vec<String>,
    pub num_args: u32,
    pub help_text: Option<String>,
    pub meta_var_name: Option<String>,
}

impl OptionDef {
    /// Creates an option whose record name and spelling are `name`.
    pub fn new(name: &str, kind: OptionKind) -> Self {
        Self {
            record: name.to_string(),
            name: name.to_string(),
            enum_name: None,
            kind,
            prefixes: Vec::new(),
            group: None,
            alias: None,
            flags: Vec::new(),
            num_args: 0,
            help_text: None,
            meta_var_name: None,
        }
    }

    /// Sets the source record name.
    pub fn with_record(mut self, record: &str) -> Self {
        self.record = record.to_string();
        self
    }

    pub fn with_enum_name(mut self, enum_name: &str) -> Self {
        self.enum_name = Some(enum_name.to_string());
        self
    }

    pub fn with_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.flags = flags.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_num_args(mut self, num_args: u32) -> Self {
        self.num_args = num_args;
        self
    }

    pub fn with_help_text(mut self, help: &str) -> Self {
        self.help_text = Some(help.to_string());
        self
    }

    pub fn with_meta_var(mut self, meta_var: &str) -> Self {
        self.meta_var_name = Some(meta_var.to_string());
        self
    }

    /// Identifier used in the emitted table.
    pub fn identifier(&self) -> &str {
        self.enum_name.as_deref().unwrap_or(&self.record)
    }

    /// Returns `true` if the option's kind is a sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.kind.sentinel
    }
}

/// Identifier of a record: its `EnumName` when set, else its own name.
pub fn record_identifier<S: RecordStore + ?Sized>(store: &S, id: RecordId) -> Result<String> {
    Ok(store
        .get_optional_string(id, "EnumName")?
        .unwrap_or_else(|| store.record_name(id).to_string()))
}

/// Reads every `OptionGroup` record, in definition order.
pub fn load_groups<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<OptionGroup>> {
    store
        .records_of_class(GROUP_CLASS)
        .into_iter()
        .map(|id| load_group(store, id))
        .collect()
}

/// Reads every `Option` record, in definition order.
pub fn load_options<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<OptionDef>> {
    store
        .records_of_class(OPTION_CLASS)
        .into_iter()
        .map(|id| load_option(store, id))
        .collect()
}

fn load_group<S: RecordStore + ?Sized>(store: &S, id: RecordId) -> Result<OptionGroup> {
    Ok(OptionGroup {
        record: store.record_name(id).to_string(),
        name: store.get_string(id, "Name")?,
        enum_name: store.get_optional_string(id, "EnumName")?,
        parent: resolve(store, id, "Group", GROUP_CLASS)?,
        help_text: store.get_optional_string(id, "HelpText")?,
    })
}

fn load_option<S: RecordStore + ?Sized>(store: &S, id: RecordId) -> Result<OptionDef> {
    let record = store.record_name(id).to_string();

    let kind_id = store
        .get_reference(id, "Kind")?
        .ok_or_else(|| TableGenError::MissingField {
            record: record.clone(),
            field: "Kind".to_string(),
        })?;
    expect_class(store, kind_id, KIND_CLASS)?;

    let num_args = store.get_int(id, "NumArgs")?;
    let num_args = u32::try_from(num_args).map_err(|_| TableGenError::FieldType {
        record: record.clone(),
        field: "NumArgs".to_string(),
        expected: "a non-negative integer",
    })?;

    let option = OptionDef {
        name: store.get_string(id, "Name")?,
        enum_name: store.get_optional_string(id, "EnumName")?,
        kind: OptionKind {
            name: store.get_string(kind_id, "Name")?,
            precedence: store.get_int(kind_id, "Precedence")?,
            sentinel: store.get_bool(kind_id, "Sentinel")?,
        },
        prefixes: store.get_ordered_strings(id, "Prefixes")?,
        group: resolve(store, id, "Group", GROUP_CLASS)?,
        alias: resolve(store, id, "Alias", OPTION_CLASS)?,
        flags: store.get_ordered_strings(id, "Flags")?,
        num_args,
        help_text: store.get_optional_string(id, "HelpText")?,
        meta_var_name: store.get_optional_string(id, "MetaVarName")?,
        record,
    };

    if option.alias.as_deref() == Some(option.identifier()) {
        warn!(option = %option.record, "Option is an alias of itself");
    }

    Ok(option)
}

fn resolve<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    field: &str,
    class: &'static str,
) -> Result<Option<String>> {
    match store.get_reference(id, field)? {
        Some(target) => {
            expect_class(store, target, class)?;
            record_identifier(store, target).map(Some)
        }
        None => Ok(None),
    }
}

fn expect_class<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    expected: &'static str,
) -> Result<()> {
    let found = store.record_class(id);
    if found == expected {
        Ok(())
    } else {
        Err(TableGenError::WrongClass {
            record: store.record_name(id).to_string(),
            found: found.to_string(),
            expected,
        })
    }
}
