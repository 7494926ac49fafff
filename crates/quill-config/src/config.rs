//! Settings file schema

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote service base path
pub const DEFAULT_BASE_URL: &str = "https://open.mowen.cn/api/open/api/v1";

/// Tag added to every publish unless already present
pub const DEFAULT_TAG: &str = "Obsidian";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_NOTE_ID_KEY: &str = "noteId";

/// Quill configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Bearer credential for the remote service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Remote service base path
    pub base_url: String,
    /// Frontmatter key holding the remote identifier
    pub note_id_key: String,
    /// Also read the default identity key when a custom one is configured
    pub legacy_key_fallback: bool,
    /// Tag appended to every publish; empty disables it
    pub default_tag: String,
    /// Default auto-publish flag
    pub auto_publish: bool,
    /// Persist the identifier into the note after publishing
    pub write_identity_back: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            note_id_key: DEFAULT_NOTE_ID_KEY.to_string(),
            legacy_key_fallback: true,
            default_tag: DEFAULT_TAG.to_string(),
            auto_publish: true,
            write_identity_back: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl QuillConfig {
    /// Identity key, trimmed; blank falls back to `noteId`
    pub fn note_id_key(&self) -> &str {
        let key = self.note_id_key.trim();
        if key.is_empty() {
            DEFAULT_NOTE_ID_KEY
        } else {
            key
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Request timeout; zero means the default
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Default tag, `None` when disabled
    pub fn default_tag(&self) -> Option<&str> {
        let tag = self.default_tag.trim();
        (!tag.is_empty()).then_some(tag)
    }
}
