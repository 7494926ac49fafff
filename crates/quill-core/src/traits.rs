//! Collaborator traits
//!
//! Core defines the seams; the publish crate provides the implementations
//! (HTTP-backed asset resolution, filesystem vault) and tests inject doubles.

use crate::document::Block;
use crate::embed::EmbedReference;
use async_trait::async_trait;
use thiserror::Error;

/// Turns an embed reference into exactly one block.
///
/// Implementations never fail: an unresolvable reference must come back as a
/// fallback block (typically [`Block::RawText`] carrying `embed.raw`).
#[async_trait]
pub trait EmbedResolver: Send + Sync {
    /// Resolve one embed
    async fn resolve(&self, embed: &EmbedReference) -> Block;
}

/// A file inside the vault, addressed by its vault-relative path using `/`
/// separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultFile {
    path: String,
}

impl VaultFile {
    /// Create from a vault-relative path
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self {
            path: path.replace('\\', "/").trim_start_matches("./").to_string(),
        }
    }

    /// Vault-relative path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name including extension
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without extension
    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Lowercased extension, empty when there is none
    pub fn extension(&self) -> String {
        let name = self.name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => String::new(),
        }
    }

    /// Whether this is a markdown note
    pub fn is_markdown(&self) -> bool {
        self.extension() == "md"
    }

    /// Directory part of the path, empty at the vault root
    pub fn parent(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }
}

/// Errors from vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// Underlying IO failure
    #[error("vault IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not in the vault
    #[error("file not found in vault: {0}")]
    NotFound(String),

    /// No document is currently active
    #[error("no active document")]
    NoActiveDocument,
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Host file store: link resolution, listing, reads and the single write-back.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Resolve a link name relative to `source_path` using the host's link index
    async fn resolve_link(&self, name: &str, source_path: &str) -> Option<VaultFile>;

    /// All files known to the vault
    async fn list_files(&self) -> Vec<VaultFile>;

    /// Read a file as bytes
    async fn read_binary(&self, file: &VaultFile) -> VaultResult<Vec<u8>>;

    /// Read a file as UTF-8 text
    async fn read_text(&self, file: &VaultFile) -> VaultResult<String>;

    /// Replace a file's text content
    async fn write_text(&self, file: &VaultFile, content: &str) -> VaultResult<()>;

    /// The document currently being published, if any
    fn active_document(&self) -> Option<VaultFile>;
}
