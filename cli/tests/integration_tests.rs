use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_opt-tablegen");

/// Record file with two groups and the `-I` / `-Idir` pair.
fn write_records(dir: &Path, name: &str, idir_precedence: i64) -> PathBuf {
    let json = format!(
        r#"{{ "records": [
  {{ "name": "KIND_JOINED", "class": "OptionKind",
     "fields": {{ "Name": "KIND_JOINED", "Precedence": 1, "Sentinel": false }} }},
  {{ "name": "KIND_OTHER", "class": "OptionKind",
     "fields": {{ "Name": "KIND_OTHER", "Precedence": {idir_precedence}, "Sentinel": false }} }},
  {{ "name": "Input", "class": "OptionGroup", "fields": {{ "Name": "Input" }} }},
  {{ "name": "Output", "class": "OptionGroup", "fields": {{ "Name": "Output" }} }},
  {{ "name": "opt_I", "class": "Option",
     "fields": {{ "Name": "-I", "Kind": {{ "def": "KIND_JOINED" }}, "Prefixes": ["-"],
                 "Flags": [], "NumArgs": 1 }} }},
  {{ "name": "opt_Idir", "class": "Option",
     "fields": {{ "Name": "-Idir", "Kind": {{ "def": "KIND_OTHER" }}, "Prefixes": ["-"],
                 "Flags": [], "NumArgs": 1 }} }}
] }}"#
    );
    let path = dir.join(name);
    fs::write(&path, json).expect("failed to write records");
    path
}

/// Record file where two definitions of `-v` collide.
fn write_ambiguous_records(dir: &Path) -> PathBuf {
    let json = r#"{ "records": [
  { "name": "KIND_FLAG", "class": "OptionKind",
    "fields": { "Name": "KIND_FLAG", "Precedence": 5, "Sentinel": false } },
  { "name": "v_first", "class": "Option",
    "fields": { "Name": "v", "Kind": { "def": "KIND_FLAG" }, "Prefixes": ["-"],
                "Flags": [], "NumArgs": 0 } },
  { "name": "v_second", "class": "Option",
    "fields": { "Name": "v", "Kind": { "def": "KIND_FLAG" }, "Prefixes": ["-"],
                "Flags": [], "NumArgs": 0 } }
] }"#;
    let path = dir.join("ambiguous.json");
    fs::write(&path, json).expect("failed to write records");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .output()
        .expect("failed to run opt-tablegen")
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_writes_definitions_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_records(dir.path(), "records.json", 1);

    let output = run(&["generate", "--input", input.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<&str> = stdout.lines().filter(|l| l.starts_with("OPTION(")).collect();
    assert_eq!(
        records,
        vec![
            "OPTION(0, \"Input\", Input, Group, INVALID, INVALID, 0, 0, 0, 0)",
            "OPTION(0, \"Output\", Output, Group, INVALID, INVALID, 0, 0, 0, 0)",
            "OPTION(prefix_1, \"-Idir\", opt_Idir, KIND_OTHER, INVALID, INVALID, 0, 1, 0, 0)",
            "OPTION(prefix_1, \"-I\", opt_I, KIND_JOINED, INVALID, INVALID, 0, 1, 0, 0)",
        ]
    );
    assert!(stdout.contains("PREFIX(prefix_1, {\"-\" COMMA 0})"));
}

#[test]
fn generate_writes_output_file_deterministically() {
    let dir = TempDir::new().unwrap();
    let input = write_records(dir.path(), "records.json", 1);
    let first = dir.path().join("out/first.inc");
    let second = dir.path().join("out/second.inc");

    for out in [&first, &second] {
        let output = run(&[
            "generate",
            "--input",
            input.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);
        assert!(output.status.success());
    }

    let first = fs::read(&first).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, fs::read(&second).unwrap());
}

#[test]
fn generate_ambiguity_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_ambiguous_records(dir.path());
    let out = dir.path().join("Options.inc");

    let output = run(&[
        "generate",
        "--input",
        input.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("v_first"), "{stderr}");
    assert!(stderr.contains("v_second"), "{stderr}");
    assert!(!out.exists(), "no artifact should be written on failure");
}

#[test]
fn generate_reads_yaml_config_and_flags_override() {
    let dir = TempDir::new().unwrap();
    write_records(dir.path(), "records.json", 1);
    let config = dir.path().join("tablegen.yml");
    fs::write(&config, "mode: table\ninput: records.json\noutput: Options.inc\n").unwrap();

    let output = run(&["generate", "--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let table = fs::read_to_string(dir.path().join("Options.inc")).unwrap();
    assert!(table.contains("Option Parsing Table"));
    assert!(!table.contains("OPTION("));

    let output = run(&[
        "generate",
        "--config",
        config.to_str().unwrap(),
        "--mode",
        "definitions",
    ]);
    assert!(output.status.success());
    let defs = fs::read_to_string(dir.path().join("Options.inc")).unwrap();
    assert!(defs.contains("Option Parsing Definitions"));
    assert!(defs.contains("OPTION(prefix_1"));
}

#[test]
fn generate_requires_an_input() {
    let output = run(&["generate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input record file"));
}

#[test]
fn generate_rejects_invalid_record_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(
        &input,
        r#"{ "records": [ { "name": "bad-name", "class": "OptionGroup", "fields": { "Name": "x" } } ] }"#,
    )
    .unwrap();

    let output = run(&["generate", "--input", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid identifier"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_prints_table_order() {
    let dir = TempDir::new().unwrap();
    let input = write_records(dir.path(), "records.json", 3);

    let output = run(&["check", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].contains("\"-Idir\" opt_Idir"), "{stdout}");
    assert!(lines[1].contains("\"-I\" opt_I"), "{stdout}");
    assert!(stdout.contains("Checked 2 option(s), 2 group(s), 2 prefix group(s)."));
}

#[test]
fn check_reports_ambiguity() {
    let dir = TempDir::new().unwrap();
    let input = write_ambiguous_records(dir.path());

    let output = run(&["check", "--input", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("equivalent"));
}
