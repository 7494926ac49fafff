//! Publish orchestration
//!
//! One publish runs `Idle → Converting → Publishing → (SettingVisibility)? →
//! PersistingIdentity → Done`. Conversion absorbs asset failures; a failed
//! create/edit call ends the publish with a failed outcome. A failed
//! visibility call or identity write-back is reported as a warning on an
//! otherwise successful outcome, since the note already exists remotely.

use crate::assets::AssetPipeline;
use crate::client::{NoteClient, NoteSettings};
use crate::error::{PublishError, PublishResult};
use crate::tags::normalize_tags;
use quill_config::{resolve_api_key, QuillConfig};
use quill_core::{Vault, VisibilitySettings};
use quill_parser::{convert, read_identity, write_identity, MirroredSettings};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stages of a single publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    /// Nothing started
    Idle,
    /// Building the document and uploading assets
    Converting,
    /// Create or edit call in flight
    Publishing,
    /// Follow-up visibility call in flight
    SettingVisibility,
    /// Writing the identity back into the source note
    PersistingIdentity,
    /// Finished
    Done,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStage::Idle => "idle",
            PublishStage::Converting => "converting",
            PublishStage::Publishing => "publishing",
            PublishStage::SettingVisibility => "setting visibility",
            PublishStage::PersistingIdentity => "persisting identity",
            PublishStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything needed to publish one note (or a selection of it)
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Note title, emitted as the first block
    pub title: String,
    /// Source text: a whole note or a selection
    pub text: String,
    /// Comma-separated tags
    pub tags_csv: String,
    /// Publish immediately
    pub auto_publish: bool,
    /// Section and privacy
    pub visibility: VisibilitySettings,
    /// Persist the identity into the active document afterwards
    pub write_identity_back: bool,
    /// Optional summary shown under the title
    pub summary: Option<String>,
}

impl PublishRequest {
    /// Request with default settings for `title` and `text`
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            tags_csv: String::new(),
            auto_publish: true,
            visibility: VisibilitySettings::default(),
            write_identity_back: true,
            summary: None,
        }
    }
}

/// Result of a publish attempt. Always produced; never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    /// Whether the note was created or updated remotely
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Identifier of the remote note
    pub remote_id: Option<String>,
    /// Raw server payload of a failed call, when available
    pub payload: Option<Value>,
    /// Non-fatal problems (visibility, write-back)
    pub warnings: Vec<String>,
}

impl PublishOutcome {
    fn succeeded(message: String, remote_id: String, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            message,
            remote_id: Some(remote_id),
            payload: None,
            warnings,
        }
    }

    /// Failed outcome carrying the error message and any server payload
    pub fn from_error(err: PublishError) -> Self {
        let payload = err.payload().cloned();
        Self {
            success: false,
            message: err.to_string(),
            remote_id: None,
            payload,
            warnings: Vec::new(),
        }
    }
}

/// Connection and identity settings used by the [`Publisher`]
#[derive(Debug, Clone)]
pub struct PublisherSettings {
    /// Bearer credential; `None` blocks publishing
    pub api_key: Option<String>,
    /// Remote service base path
    pub base_url: String,
    /// Frontmatter key holding the identity
    pub identity_key: String,
    /// Also read the default identity key
    pub legacy_key_fallback: bool,
    /// Tag appended to every publish
    pub default_tag: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl PublisherSettings {
    /// Settings from config, with the API key resolved from env then config
    pub fn from_config(config: &QuillConfig) -> Self {
        Self {
            api_key: resolve_api_key(config).map(|(key, _)| key),
            base_url: config.base_url().to_string(),
            identity_key: config.note_id_key().to_string(),
            legacy_key_fallback: config.legacy_key_fallback,
            default_tag: config.default_tag().unwrap_or_default().to_string(),
            timeout: config.timeout(),
        }
    }
}

/// Drives a publish against a vault and the remote service
pub struct Publisher<V: Vault + ?Sized> {
    vault: Arc<V>,
    client: Option<Arc<NoteClient>>,
    settings: PublisherSettings,
}

impl<V: Vault + ?Sized> Publisher<V> {
    /// Create a publisher. No client is built without an API key.
    pub fn new(vault: Arc<V>, settings: PublisherSettings) -> Self {
        let client = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Arc::new(NoteClient::new(key, &settings.base_url, settings.timeout)));
        Self {
            vault,
            client,
            settings,
        }
    }

    /// Publish a note and report the outcome
    pub async fn publish(&self, request: &PublishRequest) -> PublishOutcome {
        let outcome = match self.run(request).await {
            Ok(outcome) => outcome,
            Err(e) => PublishOutcome::from_error(e),
        };

        if outcome.success {
            info!(
                "Published '{}' as {}",
                request.title,
                outcome.remote_id.as_deref().unwrap_or_default()
            );
        } else {
            info!("Publishing '{}' failed: {}", request.title, outcome.message);
        }
        outcome
    }

    async fn run(&self, request: &PublishRequest) -> PublishResult<PublishOutcome> {
        let mut stage = PublishStage::Idle;

        let client = self.client.clone().ok_or_else(|| {
            PublishError::Configuration("API key is not configured".to_string())
        })?;

        let existing = self.stored_identity(&request.text).await;

        advance(&mut stage, PublishStage::Converting);
        let pipeline = AssetPipeline::new(
            Arc::clone(&self.vault),
            Arc::clone(&client),
            self.settings.identity_key.clone(),
            self.settings.legacy_key_fallback,
        );
        let document = convert(
            &pipeline,
            &request.title,
            &request.text,
            request.summary.as_deref(),
        )
        .await;
        let tags = normalize_tags(&request.tags_csv, &self.settings.default_tag);

        advance(&mut stage, PublishStage::Publishing);
        let restricted = request.visibility.needs_follow_up();
        let note_settings = NoteSettings {
            auto_publish: request.auto_publish,
            tags: tags.clone(),
            privacy: restricted.then_some(request.visibility.privacy),
        };
        let remote_id = client
            .save_note(existing.as_deref(), &document, &note_settings)
            .await?;

        let mut warnings = Vec::new();

        if restricted {
            advance(&mut stage, PublishStage::SettingVisibility);
            if let Err(e) = client.set_visibility(&remote_id, &request.visibility).await {
                warn!("Visibility update for {} failed: {}", remote_id, e);
                warnings.push(format!("Visibility settings were not applied: {e}"));
            }
        }

        if request.write_identity_back {
            advance(&mut stage, PublishStage::PersistingIdentity);
            let mirrored = MirroredSettings {
                tags,
                auto_publish: request.auto_publish,
                privacy: restricted.then_some(request.visibility.privacy),
            };
            if let Err(e) = self.persist_identity(&remote_id, &mirrored).await {
                warn!("Could not save identity {}: {}", remote_id, e);
                warnings.push(format!("Note identity was not saved: {e}"));
            }
        }

        advance(&mut stage, PublishStage::Done);
        let message = if existing.is_some() {
            format!("Updated note {remote_id}")
        } else {
            format!("Created note {remote_id}")
        };
        Ok(PublishOutcome::succeeded(message, remote_id, warnings))
    }

    /// Identity of the note being published.
    ///
    /// The published text wins. A selection carries no header, so the
    /// active document's identity is used instead; write-back targets that
    /// same document and must keep pointing at the same remote note.
    async fn stored_identity(&self, text: &str) -> Option<String> {
        let key = &self.settings.identity_key;
        let legacy = self.settings.legacy_key_fallback;
        if let Some(id) = read_identity(text, key, legacy) {
            return Some(id);
        }

        let file = self.vault.active_document()?;
        match self.vault.read_text(&file).await {
            Ok(current) => read_identity(&current, key, legacy),
            Err(e) => {
                debug!("No identity read from {}: {}", file.path(), e);
                None
            }
        }
    }

    /// Write the identity into the active document as it is now on disk
    async fn persist_identity(
        &self,
        remote_id: &str,
        mirrored: &MirroredSettings,
    ) -> PublishResult<()> {
        let file = self
            .vault
            .active_document()
            .ok_or(quill_core::VaultError::NoActiveDocument)?;
        let current = self.vault.read_text(&file).await?;
        let updated = write_identity(&current, &self.settings.identity_key, remote_id, mirrored)?;
        if updated != current {
            self.vault.write_text(&file, &updated).await?;
            debug!("Saved identity {} into {}", remote_id, file.path());
        }
        Ok(())
    }
}

fn advance(stage: &mut PublishStage, next: PublishStage) {
    debug!("Publish stage: {} -> {}", stage, next);
    *stage = next;
}
