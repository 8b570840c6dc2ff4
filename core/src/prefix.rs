//! Prefix-list interning.
//!
//! Every distinct ordered prefix list gets one identifier, `prefix_<n>`, so
//! the emitted table can share a single null-terminated array between all
//! options spelled with the same prefixes. The empty list is always
//! `prefix_0`; the rest are numbered by first occurrence in table order.

use std::collections::HashMap;

use tracing::debug;

use crate::schema::OptionDef;

/// Identifier of the empty prefix list.
pub const EMPTY_PREFIX_ID: &str = "prefix_0";

/// One interned prefix list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroup {
    pub id: String,
    pub prefixes: Vec<String>,
}

/// Assigns identifiers to prefix lists for a single generation run.
///
/// # Examples
///
/// ```
/// use opt_table_core::PrefixInterner;
///
/// let mut interner = PrefixInterner::new();
/// let both = vec!["-".to_string(), "--".to_string()];
/// assert_eq!(interner.intern(&both), "prefix_1");
/// assert_eq!(interner.intern(&["-".to_string()]), "prefix_2");
/// assert_eq!(interner.intern(&both), "prefix_1");
/// assert_eq!(interner.intern(&[]), "prefix_0");
/// ```
#[derive(Debug, Clone)]
pub struct PrefixInterner {
    ids: HashMap<Vec<String>, usize>,
    groups: Vec<PrefixGroup>,
}

impl Default for PrefixInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixInterner {
    /// Creates an interner holding only the empty list.
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(Vec::new(), 0);
        Self {
            ids,
            groups: vec![PrefixGroup {
                id: EMPTY_PREFIX_ID.to_string(),
                prefixes: Vec::new(),
            }],
        }
    }

    /// Interns every prefix list of `options`, walking them in order.
    pub fn from_sorted(options: &[OptionDef]) -> Self {
        let mut interner = Self::new();
        for option in options {
            interner.intern(&option.prefixes);
        }
        debug!(
            options = options.len(),
            groups = interner.groups().len(),
            "Interned prefix groups"
        );
        interner
    }

    /// Returns the identifier of `prefixes`, registering it if unseen.
    pub fn intern(&mut self, prefixes: &[String]) -> &str {
        let index = match self.ids.get(prefixes) {
            Some(&index) => index,
            None => {
                let index = self.groups.len();
                self.groups.push(PrefixGroup {
                    id: format!("prefix_{index}"),
                    prefixes: prefixes.to_vec(),
                });
                self.ids.insert(prefixes.to_vec(), index);
                index
            }
        };
        &self.groups[index].id
    }

    /// Identifier of an already interned list.
    pub fn id_of(&self, prefixes: &[String]) -> Option<&str> {
        self.ids
            .get(prefixes)
            .map(|&index| self.groups[index].id.as_str())
    }

    /// All groups in ascending identifier order.
    pub fn groups(&self) -> &[PrefixGroup] {
        &self.groups
    }
}
