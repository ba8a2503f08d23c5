//! End-to-end tests of the `tabcodec` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const ENV_VARS: [&str; 4] = [
    "TABCODEC_DELIMITER",
    "TABCODEC_BOM",
    "TABCODEC_NEWLINE",
    "TABCODEC_ID_FIELD",
];

fn tabcodec(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tabcodec"));
    cmd.current_dir(dir).args(args);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.output().expect("failed to run tabcodec")
}

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn parse_outputs_json_records() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.csv", "id;name\r\n1;\"Doe; John\"\r\n\r\n2;Alice\r\n");

    let out = tabcodec(dir.path(), &["parse", &input]);
    assert!(out.status.success());

    let records: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        records,
        serde_json::json!([
            {"id": "1", "name": "Doe; John"},
            {"id": "2", "name": "Alice"}
        ])
    );
}

#[test]
fn encode_writes_bom_and_quotes() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "in.json",
        r#"[{"id": 1, "note": "He said \"hi\", ok", "extra": "x"}]"#,
    );

    let out = tabcodec(
        dir.path(),
        &["encode", &input, "--headers", "id,note,missing", "-o", "out.csv"],
    );
    assert!(out.status.success());
    assert_eq!(
        read(&dir, "out.csv"),
        "\u{feff}id,note,missing\n1,\"He said \"\"hi\"\", ok\","
    );
}

#[test]
fn merge_upserts_by_id() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.csv", "id,v\n1,a\n2,b\n");
    let updates = write(&dir, "updates.csv", "id,v\n2,c\n3,d\n");

    let out = tabcodec(
        dir.path(),
        &["merge", &base, &updates, "--no-bom", "-o", "merged.csv"],
    );
    assert!(out.status.success());
    assert_eq!(read(&dir, "merged.csv"), "id,v\n1,a\n2,c\n3,d");
}

#[test]
fn merge_missing_id_fails() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.csv", "id,v\n1,a\n");
    let updates = write(&dir, "updates.csv", "key,v\n2,c\n");

    let out = tabcodec(dir.path(), &["merge", &base, &updates]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Record 0 of updates has no 'id' field"));
}

#[test]
fn sort_keeps_input_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.tsv", "id\tn\n1\t10\n2\t9\n3\t10\n");

    let out = tabcodec(
        dir.path(),
        &["sort", &input, "--key", "n", "--desc", "--no-bom", "-o", "sorted.tsv"],
    );
    assert!(out.status.success());
    assert_eq!(read(&dir, "sorted.tsv"), "id\tn\n1\t10\n3\t10\n2\t9");
}

#[test]
fn env_config_applies_and_flags_override() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.csv", "id,v\n1,a\n");

    let out = Command::new(env!("CARGO_BIN_EXE_tabcodec"))
        .current_dir(dir.path())
        .env("TABCODEC_BOM", "false")
        .env("TABCODEC_NEWLINE", "crlf")
        .env_remove("TABCODEC_DELIMITER")
        .env_remove("TABCODEC_ID_FIELD")
        .args(["sort", input.as_str(), "--key", "id", "-d", ";", "-o", "out.csv"])
        .output()
        .unwrap();
    assert!(out.status.success());
    // With ';' forced, each line is a single column and commas need no quoting.
    assert_eq!(read(&dir, "out.csv"), "id,v\r\n1,a");
}

#[test]
fn rejects_multi_char_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.csv", "a\n1\n");

    let out = tabcodec(dir.path(), &["parse", &input, "-d", "::"]);
    assert!(!out.status.success());
}

#[test]
fn detect_reports_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.csv", "\"a,1\";b;c\n1;2;3\n");

    let out = tabcodec(dir.path(), &["detect", &input]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("delimiter: ;"));
    assert!(stdout.contains("header: a,1, b, c"));
}
