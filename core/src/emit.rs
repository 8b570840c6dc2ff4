//! Textual emission of option tables.
//!
//! Definitions mode produces an include file meant for macro expansion: one
//! `PREFIX(...)` record per interned prefix list, then one `OPTION(...)`
//! record per group and per option. Each section is guarded so that a
//! consumer that forgot to define the receiving macro fails to compile
//! instead of silently dropping records.
//!
//! ```text
//! PREFIX(prefix_1, {"-" COMMA 0})
//! OPTION(prefix_1, "I", I, KIND_JOINED, INPUT, INVALID, DriverOption, 1,
//!        "Add directory to include search path", "<dir>")
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generate::OptionTable;
use crate::schema::{OptionDef, OptionGroup};

/// Placeholder for an absent group or alias reference.
pub const INVALID: &str = "INVALID";

const BANNER_WIDTH: usize = 80;

/// Which artifact to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitMode {
    /// Prefix, group and option records (the default).
    #[default]
    Definitions,
    /// Parsing table artifact; only its banner is produced.
    Table,
}

impl EmitMode {
    /// Title printed in the generated-file banner.
    pub fn title(self) -> &'static str {
        match self {
            Self::Definitions => "Option Parsing Definitions",
            Self::Table => "Option Parsing Table",
        }
    }
}

/// Renders `table` as the artifact selected by `mode`.
pub fn emit(table: &OptionTable, mode: EmitMode) -> String {
    let mut out = banner(mode.title());

    match mode {
        EmitMode::Definitions => {
            emit_prefixes(table, &mut out);
            emit_groups(table.groups(), &mut out);
            emit_options(table, &mut out);
        }
        // Table mode emits the banner only.
        EmitMode::Table => {}
    }

    debug!(mode = ?mode, bytes = out.len(), "Emitted option table");
    out
}

/// Escapes `s` as the body of a C string literal.
///
/// Backslash, double quote, newline and tab get their usual escapes; other
/// bytes outside printable ASCII become three-digit octal escapes.
///
/// # Examples
///
/// ```
/// use opt_table_core::escape_c_string;
///
/// assert_eq!(escape_c_string(r#"say "hi""#), r#"say \"hi\""#);
/// assert_eq!(escape_c_string("a\tb\n"), r"a\tb\n");
/// assert_eq!(escape_c_string("\u{7f}"), r"\177");
/// ```
pub fn escape_c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_c_string(s))
}

fn banner(title: &str) -> String {
    let mut top = String::from("/*===- Generated by opt-tablegen ");
    while top.len() < BANNER_WIDTH - 2 {
        top.push('-');
    }
    top.push_str("*\\");

    let line = |text: &str| format!("|* {text:<width$} *|\n", width = BANNER_WIDTH - 6);

    let mut out = String::new();
    out.push_str(&top);
    out.push('\n');
    out.push_str(&line(""));
    out.push_str(&line(title));
    out.push_str(&line(""));
    out.push_str(&line("Automatically generated file, do not edit!"));
    out.push_str(&line(""));
    out.push_str(&format!(
        "\\*==={}===*/\n\n",
        "-".repeat(BANNER_WIDTH - 10)
    ));
    out
}

fn guard(out: &mut String, macro_name: &str) {
    out.push_str(&format!("#ifndef {macro_name}\n"));
    out.push_str(&format!(
        "#error \"Define {macro_name} prior to including this file!\"\n"
    ));
    out.push_str("#endif\n\n");
}

fn emit_prefixes(table: &OptionTable, out: &mut String) {
    guard(out, "PREFIX");

    out.push_str("/////////\n");
    out.push_str("// Prefixes\n\n");
    out.push_str("#define COMMA ,\n");
    for group in table.prefix_groups() {
        let mut values = String::new();
        for prefix in &group.prefixes {
            values.push_str(&quoted(prefix));
            values.push_str(" COMMA ");
        }
        out.push_str(&format!("PREFIX({}, {{{values}0}})\n", group.id));
    }
    out.push_str("#undef COMMA\n\n");
}

fn emit_groups(groups: &[OptionGroup], out: &mut String) {
    guard(out, "OPTION");

    out.push_str("/////////\n");
    out.push_str("// Groups\n\n");
    for group in groups {
        out.push_str(&format!(
            "OPTION(0, {}, {}, Group, {}, {INVALID}, 0, 0",
            quoted(&group.name),
            group.identifier(),
            group.parent.as_deref().unwrap_or(INVALID),
        ));
        push_help_text(out, group.help_text.as_deref());
        out.push_str(", 0)\n");
    }
    out.push('\n');
}

fn emit_options(table: &OptionTable, out: &mut String) {
    out.push_str("//////////\n");
    out.push_str("// Options\n\n");
    for entry in table.entries() {
        let option = &entry.option;
        out.push_str(&format!(
            "OPTION({}, {}, {}, {}, {}, {}, {}, {}",
            entry.prefix_id,
            quoted(&option.name),
            option.identifier(),
            option.kind.name,
            option.group.as_deref().unwrap_or(INVALID),
            option.alias.as_deref().unwrap_or(INVALID),
            flags_expr(option),
            option.num_args,
        ));
        push_help_text(out, option.help_text.as_deref());
        match option.meta_var_name.as_deref() {
            Some(meta_var) => out.push_str(&format!(", {})\n", quoted(meta_var))),
            None => out.push_str(", 0)\n"),
        }
    }
}

fn flags_expr(option: &OptionDef) -> String {
    if option.flags.is_empty() {
        "0".to_string()
    } else {
        option.flags.join(" | ")
    }
}

// Help text goes on its own continuation line.
fn push_help_text(out: &mut String, help: Option<&str>) {
    match help {
        Some(help) => {
            out.push_str(",\n       ");
            out.push_str(&quoted(help));
        }
        None => out.push_str(", 0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionKind;

    fn table() -> OptionTable {
        let mut input = OptionGroup::new("grp_input");
        input.name = "Input".to_string();
        input.help_text = Some("Input \"files\"".to_string());
        let mut nested = OptionGroup::new("grp_nested");
        nested.name = "Nested".to_string();
        nested.parent = Some("grp_input".to_string());

        let joined = OptionKind::new("KIND_JOINED", 2);
        OptionTable::build(
            vec![input, nested],
            vec![
                OptionDef::new("I", joined.clone())
                    .with_prefixes(&["-"])
                    .with_group("grp_input")
                    .with_flags(&["DriverOption", "CoreOption"])
                    .with_num_args(1)
                    .with_help_text("Add directory")
                    .with_meta_var("<dir>"),
                OptionDef::new("include", joined)
                    .with_record("include_long")
                    .with_enum_name("INCLUDE")
                    .with_prefixes(&["-", "--"])
                    .with_alias("I"),
                OptionDef::new("<input>", OptionKind::sentinel("KIND_INPUT", 1))
                    .with_record("INPUT"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_banner_lines_are_fixed_width() {
        let out = banner("Option Parsing Definitions");
        let lines: Vec<&str> = out.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|l| l.len() == BANNER_WIDTH), "{out}");
        assert!(lines[2].starts_with("|* Option Parsing Definitions"));
    }

    #[test]
    fn test_prefix_section() {
        let out = emit(&table(), EmitMode::Definitions);
        let expected = "\
#define COMMA ,
PREFIX(prefix_0, {0})
PREFIX(prefix_1, {\"-\" COMMA 0})
PREFIX(prefix_2, {\"-\" COMMA \"--\" COMMA 0})
#undef COMMA
";
        assert!(out.contains(expected), "{out}");
        assert!(out.contains("#ifndef PREFIX\n#error \"Define PREFIX prior to including this file!\"\n#endif"));
    }

    #[test]
    fn test_group_records() {
        let out = emit(&table(), EmitMode::Definitions);
        assert!(out.contains(
            "OPTION(0, \"Input\", grp_input, Group, INVALID, INVALID, 0, 0,\n       \"Input \\\"files\\\"\", 0)\n"
        ), "{out}");
        assert!(out.contains(
            "OPTION(0, \"Nested\", grp_nested, Group, grp_input, INVALID, 0, 0, 0, 0)\n"
        ));
    }

    #[test]
    fn test_option_records_follow_table_order() {
        let out = emit(&table(), EmitMode::Definitions);
        let options = out.split("// Options\n\n").nth(1).unwrap();
        let expected = "\
OPTION(prefix_0, \"<input>\", INPUT, KIND_INPUT, INVALID, INVALID, 0, 0, 0, 0)
OPTION(prefix_1, \"I\", I, KIND_JOINED, grp_input, INVALID, DriverOption | CoreOption, 1,
       \"Add directory\", \"<dir>\")
OPTION(prefix_2, \"include\", INCLUDE, KIND_JOINED, INVALID, I, 0, 0, 0, 0)
";
        assert_eq!(options, expected);
    }

    #[test]
    fn test_table_mode_emits_banner_only() {
        let out = emit(&table(), EmitMode::Table);
        assert!(out.contains("Option Parsing Table"));
        assert!(!out.contains("OPTION("));
        assert!(!out.contains("PREFIX("));
    }

    #[test]
    fn test_escape_non_ascii_as_octal() {
        assert_eq!(escape_c_string("é"), "\\303\\251");
        assert_eq!(escape_c_string("back\\slash"), "back\\\\slash");
    }
}
