//! Asset resolution and upload tests

mod common;

use common::{settings, MemoryVault};
use quill_core::Block;
use quill_parser::parse_embed_line;
use quill_publish::{AssetPipeline, NoteClient, PublishRequest, Publisher};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(server: &MockServer, vault: MemoryVault) -> AssetPipeline<MemoryVault> {
    AssetPipeline::new(
        Arc::new(vault),
        Arc::new(NoteClient::new("test-key", server.uri(), Duration::from_secs(5))),
        "noteId",
        true,
    )
}

async fn mount_upload(server: &MockServer, file_type: u8, asset_id: &str) {
    Mock::given(method("POST"))
        .and(path("/upload/prepare"))
        .and(body_partial_json(json!({ "fileType": file_type })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "form": {
                "endpoint": format!("{}/upload/deliver", server.uri()),
                "policy": "p-1",
                "signature": "s-1"
            }
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/deliver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "file": asset_id })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_phase_upload_yields_image() {
    let server = MockServer::start().await;
    mount_upload(&server, 1, "asset-1").await;

    let vault = MemoryVault::new()
        .with_file("notes/today.md", "![[cat.png]]")
        .with_file("attachments/cat.png", [137u8, 80, 78, 71])
        .with_active("notes/today.md");
    let embed = parse_embed_line("![[cat.png]]").unwrap();

    let block = pipeline(&server, vault).resolve_and_upload(&embed).await;
    assert_eq!(block, Block::image("asset-1", "cat.png"));

    let requests = server.received_requests().await.unwrap();
    let delivery = requests
        .iter()
        .find(|req| req.url.path() == "/upload/deliver")
        .unwrap();
    let body = String::from_utf8_lossy(&delivery.body);
    assert!(body.contains("name=\"policy\""));
    assert!(body.contains("p-1"));
    assert!(body.contains("name=\"file\"; filename=\"cat.png\""));
    assert!(delivery.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_pdf_uses_document_profile() {
    let server = MockServer::start().await;
    mount_upload(&server, 3, "asset-pdf").await;

    let vault = MemoryVault::new()
        .with_file("paper.pdf", b"%PDF-1.4")
        .with_active("index.md");
    let embed = parse_embed_line("![[paper.pdf]]").unwrap();

    let block = pipeline(&server, vault).resolve_and_upload(&embed).await;
    assert_eq!(block, Block::image("asset-pdf", "paper.pdf"));
}

#[tokio::test]
async fn test_missing_asset_is_raw_text_without_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/prepare"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vault = MemoryVault::new().with_active("a.md");
    let embed = parse_embed_line("![[missing.png]]").unwrap();

    let block = pipeline(&server, vault).resolve_and_upload(&embed).await;
    assert_eq!(block, Block::raw_text("![[missing.png]]"));
}

#[tokio::test]
async fn test_authorization_failure_skips_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/prepare"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "bad key" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/deliver"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vault = MemoryVault::new().with_file("cat.png", [1u8]);
    let embed = parse_embed_line("![[cat.png|200]]").unwrap();

    let block = pipeline(&server, vault).resolve_and_upload(&embed).await;
    assert_eq!(block, Block::raw_text("![[cat.png|200]]"));
}

#[tokio::test]
async fn test_delivery_failure_is_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/prepare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "form": { "endpoint": format!("{}/upload/deliver", server.uri()) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/deliver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "msg": "too large" })))
        .mount(&server)
        .await;

    let vault = MemoryVault::new().with_file("clip.mp4", [0u8; 16]);
    let embed = parse_embed_line("![[clip.mp4]]").unwrap();

    let block = pipeline(&server, vault).resolve_and_upload(&embed).await;
    assert_eq!(block, Block::raw_text("![[clip.mp4]]"));
}

#[tokio::test]
async fn test_published_note_becomes_reference() {
    let server = MockServer::start().await;
    let vault = MemoryVault::new()
        .with_file("Projects/Plan.md", "---\nnoteId: plan-42\n---\nplan")
        .with_file("Projects/Draft.md", "no header yet")
        .with_active("Projects/Index.md");
    let pipeline = pipeline(&server, vault);

    let published = parse_embed_line("[[Plan#Goals|goals]]").unwrap();
    assert_eq!(
        pipeline.resolve_and_upload(&published).await,
        Block::EmbeddedNote {
            remote_id: "plan-42".to_string()
        }
    );

    let draft = parse_embed_line("![[Draft]]").unwrap();
    assert_eq!(
        pipeline.resolve_and_upload(&draft).await,
        Block::raw_text("![[Draft]]")
    );
}

#[tokio::test]
async fn test_failed_asset_does_not_abort_publish() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/prepare"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/note/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "noteId": "n1" })))
        .expect(1)
        .mount(&server)
        .await;

    let text = "intro\n![[cat.png]]\noutro";
    let vault = Arc::new(
        MemoryVault::new()
            .with_file("note.md", text)
            .with_file("cat.png", [1u8, 2])
            .with_active("note.md"),
    );
    let publisher = Publisher::new(Arc::clone(&vault), settings(&server));

    let outcome = publisher.publish(&PublishRequest::new("T", text)).await;
    assert!(outcome.success, "{}", outcome.message);

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|req| req.url.path() == "/note/create")
        .unwrap();
    let body: Value = serde_json::from_slice(&create.body).unwrap();
    let content = body["body"]["content"].as_array().unwrap();

    let texts: Vec<&str> = content
        .iter()
        .filter_map(|block| block["content"][0]["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["T", "intro", "![[cat.png]]", "outro"]);
}
