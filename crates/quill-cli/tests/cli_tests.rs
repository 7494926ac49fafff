//! End-to-end tests for the `quill` binary
//!
//! Each test runs with an isolated `$XDG_CONFIG_HOME` and no `QUILL_*`
//! environment so the user's real configuration is never read.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quill(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("HOME", home.path())
        .env_remove("QUILL_API_KEY")
        .env_remove("QUILL_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Offline commands
// ============================================================================

#[test]
#[serial]
fn test_convert_prints_document_json() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("Reading List.md");
    fs::write(&note, "---\nnoteId: abc\n---\n> quoted\n\n**bold** text\n![[cover.png]]\n").unwrap();

    let output = quill(&temp).arg("convert").arg(&note).output().unwrap();
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["type"], "doc");
    let content = doc["content"].as_array().unwrap();
    assert_eq!(content[0]["content"][0]["text"], "Reading List");
    assert_eq!(content[1]["type"], "quote");
    assert_eq!(content[2], json!({ "type": "paragraph" }));
    assert_eq!(content[3]["content"][0]["marks"], json!([{ "type": "bold" }]));
    assert_eq!(
        content.last().unwrap()["content"][0]["marks"][0],
        json!({ "type": "image", "attrs": { "src": "cover.png" } })
    );
}

#[test]
#[serial]
fn test_id_prints_stored_identity() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("n.md");
    fs::write(&note, "---\nnoteId: remote-9\n---\nbody").unwrap();

    quill(&temp)
        .arg("id")
        .arg(&note)
        .assert()
        .success()
        .stdout(predicate::eq("remote-9\n"));
}

#[test]
#[serial]
fn test_id_fails_for_unpublished_note() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("n.md");
    fs::write(&note, "just text").unwrap();

    quill(&temp)
        .arg("id")
        .arg(&note)
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been published"));
}

#[test]
#[serial]
fn test_config_masks_api_key() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("quill.toml");
    fs::write(&config, "api_key = \"secret-key-1234\"\ndefault_tag = \"Notes\"\n").unwrap();

    quill(&temp)
        .arg("-C")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("1234"))
        .stdout(predicate::str::contains("secret-key").not())
        .stdout(predicate::str::contains("default_tag = \"Notes\""));
}

#[test]
#[serial]
fn test_config_init_writes_defaults_once() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("nested").join("quill.toml");

    quill(&temp)
        .arg("-C")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("note_id_key = \"noteId\""));

    fs::write(&config, "default_tag = \"Mine\"\n").unwrap();
    quill(&temp)
        .arg("-C")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "default_tag = \"Mine\"\n");

    quill(&temp)
        .arg("-C")
        .arg(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&config).unwrap().contains("note_id_key"));
}

// ============================================================================
// Publish
// ============================================================================

#[test]
#[serial]
fn test_publish_without_api_key_fails() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("n.md");
    fs::write(&note, "text").unwrap();

    quill(&temp)
        .arg("publish")
        .arg(&note)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is not configured"));

    assert_eq!(fs::read_to_string(&note).unwrap(), "text");
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_publish_creates_note_and_writes_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/note/create"))
        .and(body_partial_json(json!({
            "settings": { "tags": ["rust", "Obsidian"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "noteId": "cli-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let note = temp.path().join("Post.md");
    fs::write(&note, "---\ntags: [rust]\n---\nHello\n").unwrap();

    let mut cmd = quill(&temp);
    cmd.env("QUILL_API_KEY", "test-key")
        .env("QUILL_BASE_URL", server.uri())
        .arg("publish")
        .arg(&note);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Created note cli-1"));

    let stored = fs::read_to_string(&note).unwrap();
    assert!(stored.contains("noteId: cli-1"));
    assert!(stored.contains("tags:"));
    assert!(stored.ends_with("Hello\n"));
}
