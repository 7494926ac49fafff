//! Shared test fixtures: an in-memory vault and mock-server helpers

#![allow(dead_code)]

use async_trait::async_trait;
use quill_core::{Vault, VaultError, VaultFile, VaultResult};
use quill_publish::PublisherSettings;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::MockServer;

/// Vault holding files in memory, keyed by vault-relative path
#[derive(Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    active: Option<VaultFile>,
    writes: Mutex<usize>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.as_ref().to_vec());
        self
    }

    pub fn with_active(mut self, path: &str) -> Self {
        self.active = Some(VaultFile::new(path));
        self
    }

    pub fn text(&self, path: &str) -> String {
        let files = self.files.lock().unwrap();
        String::from_utf8(files.get(path).cloned().unwrap_or_default()).unwrap()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

#[async_trait]
impl Vault for MemoryVault {
    async fn resolve_link(&self, name: &str, source_path: &str) -> Option<VaultFile> {
        let dir = VaultFile::new(source_path).parent().to_string();
        let mut candidates = vec![name.to_string()];
        if VaultFile::new(name).extension().is_empty() {
            candidates.push(format!("{name}.md"));
        }
        for prefix in [dir.as_str(), ""] {
            for candidate in &candidates {
                let path = if prefix.is_empty() {
                    candidate.clone()
                } else {
                    format!("{prefix}/{candidate}")
                };
                if self.contains(&path) {
                    return Some(VaultFile::new(path));
                }
            }
        }
        None
    }

    async fn list_files(&self) -> Vec<VaultFile> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .map(VaultFile::new)
            .collect()
    }

    async fn read_binary(&self, file: &VaultFile) -> VaultResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(file.path())
            .cloned()
            .ok_or_else(|| VaultError::NotFound(file.path().to_string()))
    }

    async fn read_text(&self, file: &VaultFile) -> VaultResult<String> {
        let bytes = self.read_binary(file).await?;
        String::from_utf8(bytes)
            .map_err(|e| VaultError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    async fn write_text(&self, file: &VaultFile, content: &str) -> VaultResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(file.path().to_string(), content.as_bytes().to_vec());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn active_document(&self) -> Option<VaultFile> {
        self.active.clone()
    }
}

/// Publisher settings pointed at a mock server
pub fn settings(server: &MockServer) -> PublisherSettings {
    PublisherSettings {
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        identity_key: "noteId".to_string(),
        legacy_key_fallback: true,
        default_tag: "Obsidian".to_string(),
        timeout: Duration::from_secs(5),
    }
}
