//! CLI edit integration tests
//!
//! Drive the built `confnode` binary against documents in a scratch directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{json, Value as Json};
use tempfile::TempDir;

const SCHEMA: &str = r#"
schema_version: 0
module: app
definitions:
  - kind: container
    ident: server
    definitions:
      - { kind: leaf, ident: name, type: string, default: unnamed }
      - { kind: leaf, ident: port, type: int32 }
      - { kind: leaf, ident: debug, type: boolean, default: false }
  - kind: list
    ident: route
    key: [prefix]
    definitions:
      - { kind: leaf, ident: prefix, type: string }
      - { kind: leaf, ident: upstream, type: string }
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn write_json(dir: &TempDir, name: &str, doc: &Json) -> PathBuf {
    write(dir, name, &doc.to_string())
}

fn confnode(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_confnode"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> Json {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON document")
}

#[test]
fn test_cli_merge_into_empty_target_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "app.yaml", SCHEMA);
    let source = write_json(&dir, "source.json", &json!({"server": {"name": "c1", "port": 8090}}));

    let output = confnode(&[
        "edit",
        "--schema",
        schema.to_str().unwrap(),
        "--source",
        source.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_json(&output),
        json!({"server": {"name": "c1", "port": 8090, "debug": false}})
    );
}

#[test]
fn test_cli_merge_list_into_target_file() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "app.yaml", SCHEMA);
    let target = write_json(
        &dir,
        "target.json",
        &json!({"route": [{"prefix": "/api", "upstream": "a"}]}),
    );
    let source = write_json(
        &dir,
        "source.json",
        &json!({"route": [{"prefix": "/api", "upstream": "b"}, {"prefix": "/web", "upstream": "c"}]}),
    );
    let out = dir.path().join("merged.json");

    let output = confnode(&[
        "edit",
        "--schema",
        schema.to_str().unwrap(),
        "--source",
        source.to_str().unwrap(),
        "--target",
        target.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let merged: Json = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        merged,
        json!({"route": [
            {"prefix": "/api", "upstream": "b"},
            {"prefix": "/web", "upstream": "c"}
        ]})
    );
}

#[test]
fn test_cli_create_existing_container_fails_with_conflict() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "app.yaml", SCHEMA);
    let target = write_json(&dir, "target.json", &json!({"server": {"port": 1}}));
    let source = write_json(&dir, "source.json", &json!({"server": {"port": 2}}));

    let output = confnode(&[
        "edit",
        "--schema",
        schema.to_str().unwrap(),
        "--source",
        source.to_str().unwrap(),
        "--target",
        target.to_str().unwrap(),
        "--strategy",
        "create",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: [ERR_CONFLICT] status 409"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(stderr.contains("(path: app/server)"));
}

#[test]
fn test_cli_replace_is_not_implemented() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "app.yaml", SCHEMA);
    let source = write_json(&dir, "source.json", &json!({}));

    let output = confnode(&[
        "edit",
        "--schema",
        schema.to_str().unwrap(),
        "--source",
        source.to_str().unwrap(),
        "--strategy",
        "replace",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_NOT_IMPLEMENTED] status 501"));
}

#[test]
fn test_cli_check_reports_unknown_member() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "app.yaml", SCHEMA);
    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.json"), json!({"server": {"port": 1}}).to_string()).unwrap();
    fs::write(docs.join("b.json"), json!({"server": {"bogus": 1}}).to_string()).unwrap();

    let output = confnode(&[
        "check",
        "--schema",
        schema.to_str().unwrap(),
        docs.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("a.json"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_UNKNOWN_IDENT]"));
}
