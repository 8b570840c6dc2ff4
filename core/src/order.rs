//! Canonical option ordering.
//!
//! The emitted table is scanned linearly, first match wins, so it must list
//! longer spellings before the spellings they extend (`-Idir` before `-I`).
//! [`compare_options`] defines that order and [`sort_options`] applies it,
//! rejecting options the matcher could never tell apart.
//!
//! Stages, first decisive one wins:
//!
//! 1. sentinel kinds sort before everything else;
//! 2. names, with a name sorting after every name it is a prefix of;
//! 3. prefix lists, element-wise with the same rule, then longer list first;
//! 4. kind precedence, ascending.
//!
//! Stage 3 settles prefix lists of different lengths before precedence is
//! looked at, so `["-", "--"]` sorts before `["-"]` whatever the kinds.
//!
//! Sentinels skip stages 2 and 3 and are ordered by precedence, with their
//! prefix lists only breaking ties. Two options that tie on every stage are
//! ambiguous.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{Result, TableGenError};
use crate::schema::OptionDef;

/// Compares two spellings so that a string sorts after its extensions.
///
/// Plain byte-wise order, except that running out of characters first makes
/// a string *greater*.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use opt_table_core::compare_option_names;
///
/// assert_eq!(compare_option_names("foo-bar", "foo"), Ordering::Less);
/// assert_eq!(compare_option_names("a", "b"), Ordering::Less);
/// assert_eq!(compare_option_names("x", "x"), Ordering::Equal);
/// ```
pub fn compare_option_names(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(i) => a[i].cmp(&b[i]),
        None => b.len().cmp(&a.len()),
    }
}

/// Compares prefix lists element-wise with [`compare_option_names`]; when
/// one list is exhausted first, the longer list sorts first.
pub fn compare_prefix_lists(a: &[String], b: &[String]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| compare_option_names(x, y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| b.len().cmp(&a.len()))
}

/// Total order over option definitions.
///
/// Returns [`Ordering::Equal`] only for ambiguous pairs: same name, same
/// prefix list and same precedence (sentinels: same precedence and prefix
/// list).
pub fn compare_options(a: &OptionDef, b: &OptionDef) -> Ordering {
    match (a.is_sentinel(), b.is_sentinel()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a
            .kind
            .precedence
            .cmp(&b.kind.precedence)
            .then_with(|| compare_prefix_lists(&a.prefixes, &b.prefixes)),
        (false, false) => compare_option_names(&a.name, &b.name)
            .then_with(|| compare_prefix_lists(&a.prefixes, &b.prefixes))
            .then_with(|| a.kind.precedence.cmp(&b.kind.precedence)),
    }
}

/// Sorts options into table order.
///
/// The sort is stable, so ambiguous definitions end up adjacent with the
/// earlier definition first.
///
/// # Errors
///
/// Returns [`TableGenError::AmbiguousOption`] naming the first pair of
/// definitions that compare equal. No order is produced in that case.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptionDef, OptionKind, sort_options};
///
/// let kind = OptionKind::new("KIND_JOINED", 1);
/// let sorted = sort_options(vec![
///     OptionDef::new("I", kind.clone()).with_prefixes(&["-"]),
///     OptionDef::new("Idir", kind).with_prefixes(&["-"]),
/// ])
/// .unwrap();
/// assert_eq!(sorted[0].name, "Idir");
/// ```
pub fn sort_options(mut options: Vec<OptionDef>) -> Result<Vec<OptionDef>> {
    options.sort_by(compare_options);

    if let Some(pair) = options
        .windows(2)
        .find(|pair| compare_options(&pair[0], &pair[1]).is_eq())
    {
        return Err(TableGenError::AmbiguousOption {
            first: pair[0].record.clone(),
            second: pair[1].record.clone(),
        });
    }

    debug!(options = options.len(), "Sorted options into table order");
    Ok(options)
}
