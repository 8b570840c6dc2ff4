//! Option-table compiler core.
//!
//! Turns declarative option definitions into the canonical table a runtime
//! option matcher scans:
//!
//! - [`RecordStore`]: read-only capability over option, group and kind
//!   records; [`MemoryStore`] implements it in memory and for JSON/YAML
//!   record files.
//! - [`load_groups`] / [`load_options`]: typed view of those records.
//! - [`sort_options`]: the canonical order (sentinels first, longer
//!   spellings before their prefixes), failing on ambiguous definitions.
//! - [`PrefixInterner`]: one `prefix_<n>` identifier per distinct prefix
//!   list.
//! - [`OptionTable`] and [`emit`]: the table and its textual artifact.
//!
//! # Example
//!
//! ```
//! use opt_table_core::*;
//!
//! let store = MemoryStore::from_records([
//!     Record::new("KIND_JOINED", "OptionKind")
//!         .with("Name", "KIND_JOINED")
//!         .with("Precedence", 1)
//!         .with("Sentinel", false),
//!     Record::new("I", "Option")
//!         .with("Name", "I")
//!         .with("Kind", FieldValue::reference("KIND_JOINED"))
//!         .with("Prefixes", vec!["-"])
//!         .with("Flags", Vec::<String>::new())
//!         .with("NumArgs", 1),
//! ]);
//! assert!(validate_store(&store).is_empty());
//!
//! let text = generate(&store, EmitMode::Definitions).unwrap();
//! assert!(text.contains("OPTION(prefix_1, \"I\", I, KIND_JOINED, INVALID, INVALID, 0, 1, 0, 0)"));
//! ```

mod config;
mod emit;
mod error;
mod generate;
mod order;
mod prefix;
mod records;
mod schema;
mod validate;

pub use config::GeneratorConfig;
pub use emit::{EmitMode, INVALID, emit, escape_c_string};
pub use error::{Result, TableGenError};
pub use generate::{OptionTable, TableEntry, generate};
pub use order::{compare_option_names, compare_options, compare_prefix_lists, sort_options};
pub use prefix::{EMPTY_PREFIX_ID, PrefixGroup, PrefixInterner};
pub use records::{
    FieldValue, GROUP_CLASS, KIND_CLASS, MemoryStore, OPTION_CLASS, Record, RecordId, RecordStore,
};
pub use schema::{
    OptionDef, OptionGroup, OptionKind, load_groups, load_options, record_identifier,
};
pub use validate::{ValidationError, ensure_valid, validate_store};
