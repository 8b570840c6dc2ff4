//! One generation run: read records, order, intern, emit.
//!
//! [`OptionTable`] holds everything the emitter needs and is only built when
//! the whole option set orders cleanly, so a failed run never yields a
//! partial table.

use tracing::info;

use crate::emit::{EmitMode, emit};
use crate::error::Result;
use crate::order::sort_options;
use crate::prefix::{PrefixGroup, PrefixInterner};
use crate::records::RecordStore;
use crate::schema::{OptionDef, OptionGroup, load_groups, load_options};

/// An option in table order together with its prefix group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub option: OptionDef,
    /// Identifier of the option's interned prefix list.
    pub prefix_id: String,
}

/// Groups, ordered options and interned prefixes of one run.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptionDef, OptionGroup, OptionKind, OptionTable};
///
/// let kind = OptionKind::new("KIND_JOINED", 1);
/// let table = OptionTable::build(
///     vec![OptionGroup::new("Input"), OptionGroup::new("Output")],
///     vec![
///         OptionDef::new("-I", kind.clone()).with_prefixes(&["-"]).with_num_args(1),
///         OptionDef::new("-Idir", kind).with_prefixes(&["-"]).with_num_args(1),
///     ],
/// )
/// .unwrap();
///
/// let order: Vec<&str> = table.options().map(|o| o.name.as_str()).collect();
/// assert_eq!(order, vec!["-Idir", "-I"]);
/// assert_eq!(table.entries()[0].prefix_id, table.entries()[1].prefix_id);
/// ```
#[derive(Debug, Clone)]
pub struct OptionTable {
    groups: Vec<OptionGroup>,
    entries: Vec<TableEntry>,
    prefixes: PrefixInterner,
}

impl OptionTable {
    /// Orders `options` and interns their prefix lists.
    ///
    /// Groups keep the order they are given in.
    ///
    /// # Errors
    ///
    /// Returns [`AmbiguousOption`](crate::TableGenError::AmbiguousOption)
    /// when two options cannot be told apart.
    pub fn build(groups: Vec<OptionGroup>, options: Vec<OptionDef>) -> Result<Self> {
        let sorted = sort_options(options)?;
        let mut prefixes = PrefixInterner::new();
        let entries = sorted
            .into_iter()
            .map(|option| TableEntry {
                prefix_id: prefixes.intern(&option.prefixes).to_string(),
                option,
            })
            .collect();

        Ok(Self {
            groups,
            entries,
            prefixes,
        })
    }

    /// Reads groups and options from `store` and builds the table.
    pub fn from_store<S: RecordStore + ?Sized>(store: &S) -> Result<Self> {
        let groups = load_groups(store)?;
        let options = load_options(store)?;
        Self::build(groups, options)
    }

    /// Groups in schema order.
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// Options in table order with their prefix identifiers.
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Options in table order.
    pub fn options(&self) -> impl Iterator<Item = &OptionDef> {
        self.entries.iter().map(|entry| &entry.option)
    }

    /// Interned prefix lists in ascending identifier order.
    pub fn prefix_groups(&self) -> &[PrefixGroup] {
        self.prefixes.groups()
    }

    /// Renders the table in `mode`.
    pub fn render(&self, mode: EmitMode) -> String {
        emit(self, mode)
    }
}

/// Runs a full generation over `store` and returns the artifact text.
///
/// # Errors
///
/// Any record precondition violation or ambiguous option definition aborts
/// the run; no text is returned in that case.
pub fn generate<S: RecordStore + ?Sized>(store: &S, mode: EmitMode) -> Result<String> {
    let table = OptionTable::from_store(store)?;
    info!(
        groups = table.groups().len(),
        options = table.entries().len(),
        prefix_groups = table.prefix_groups().len(),
        "Built option table"
    );
    Ok(table.render(mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableGenError;
    use crate::prefix::EMPTY_PREFIX_ID;
    use crate::records::{FieldValue, GROUP_CLASS, KIND_CLASS, MemoryStore, OPTION_CLASS, Record};
    use crate::schema::OptionKind;

    fn option_record(record: &str, name: &str, kind: &str, prefixes: Vec<&str>) -> Record {
        Record::new(record, OPTION_CLASS)
            .with("Name", name)
            .with("Kind", FieldValue::reference(kind))
            .with("Prefixes", prefixes)
            .with("Flags", Vec::<String>::new())
            .with("NumArgs", 0)
    }

    #[test]
    fn test_prefix_ids_follow_table_order() {
        let kind = OptionKind::new("KIND_FLAG", 1);
        let table = OptionTable::build(
            Vec::new(),
            vec![
                OptionDef::new("b", kind.clone()).with_prefixes(&["-"]),
                OptionDef::new("a", kind.clone()).with_prefixes(&["-", "--"]),
                OptionDef::new("c", kind.clone()).with_prefixes(&["-", "--"]),
                OptionDef::new("d", kind),
            ],
        )
        .unwrap();

        let ids: Vec<(&str, &str)> = table
            .entries()
            .iter()
            .map(|e| (e.option.name.as_str(), e.prefix_id.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("a", "prefix_1"),
                ("b", "prefix_2"),
                ("c", "prefix_1"),
                ("d", EMPTY_PREFIX_ID),
            ]
        );
        assert_eq!(table.prefix_groups().len(), 3);
    }

    #[test]
    fn test_generate_from_store() {
        let store = MemoryStore::from_records([
            Record::new("KIND_FLAG", KIND_CLASS)
                .with("Name", "KIND_FLAG")
                .with("Precedence", 4)
                .with("Sentinel", false),
            Record::new("grp", GROUP_CLASS).with("Name", "General"),
            option_record("help", "help", "KIND_FLAG", vec!["--"]).with("HelpText", "Show help"),
        ]);

        let out = generate(&store, EmitMode::Definitions).unwrap();
        assert!(out.contains("OPTION(0, \"General\", grp, Group, INVALID, INVALID, 0, 0, 0, 0)"));
        assert!(out.contains(
            "OPTION(prefix_1, \"help\", help, KIND_FLAG, INVALID, INVALID, 0, 0,\n       \"Show help\", 0)"
        ));
    }

    #[test]
    fn test_generate_aborts_on_ambiguity() {
        let store = MemoryStore::from_records([
            Record::new("KIND_FLAG", KIND_CLASS)
                .with("Name", "KIND_FLAG")
                .with("Precedence", 5)
                .with("Sentinel", false),
            option_record("v_one", "v", "KIND_FLAG", vec!["-"]),
            option_record("v_two", "v", "KIND_FLAG", vec!["-"]),
        ]);

        let err = generate(&store, EmitMode::Definitions).unwrap_err();
        assert!(matches!(
            err,
            TableGenError::AmbiguousOption { ref first, ref second }
                if first == "v_one" && second == "v_two"
        ));
        assert!(err.to_string().contains("v_one"));
        assert!(err.to_string().contains("v_two"));
    }
}
