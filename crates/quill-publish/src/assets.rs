//! Asset resolution and two-phase upload
//!
//! Every embed becomes exactly one block. Lookup goes through the vault's link
//! resolution against the active document, then an exact file-name match over
//! all files. Notes become note references when they carry an identity;
//! everything else is uploaded (authorize, then deliver) one asset at a time.
//! Any failure degrades the embed to its literal source text.

use crate::client::NoteClient;
use crate::error::{PublishError, PublishResult};
use crate::media::{mime_for_extension, MediaType};
use async_trait::async_trait;
use quill_core::{Block, EmbedReference, EmbedResolver, Vault, VaultFile};
use quill_parser::read_identity;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves embeds against a vault and uploads binary assets
pub struct AssetPipeline<V: Vault + ?Sized> {
    vault: Arc<V>,
    client: Arc<NoteClient>,
    identity_key: String,
    legacy_key_fallback: bool,
}

impl<V: Vault + ?Sized> AssetPipeline<V> {
    /// Create a pipeline. `identity_key` and `legacy_key_fallback` control how
    /// embedded notes' identities are read.
    pub fn new(
        vault: Arc<V>,
        client: Arc<NoteClient>,
        identity_key: impl Into<String>,
        legacy_key_fallback: bool,
    ) -> Self {
        Self {
            vault,
            client,
            identity_key: identity_key.into(),
            legacy_key_fallback,
        }
    }

    /// Resolve one embed. Never fails: errors yield `RawText` of the embed.
    pub async fn resolve_and_upload(&self, embed: &EmbedReference) -> Block {
        match self.try_resolve(embed).await {
            Ok(block) => block,
            Err(e) => {
                warn!("Embed {} left as text: {}", embed.raw, e);
                Block::raw_text(&embed.raw)
            }
        }
    }

    async fn try_resolve(&self, embed: &EmbedReference) -> PublishResult<Block> {
        if embed.is_remote() {
            return Ok(Block::legacy_image(embed.name()));
        }

        let name = embed.name();
        let file = self
            .locate(name)
            .await
            .ok_or_else(|| PublishError::UnresolvedReference(name.to_string()))?;

        if file.is_markdown() {
            self.note_reference(&file).await
        } else {
            self.upload(&file).await
        }
    }

    async fn locate(&self, name: &str) -> Option<VaultFile> {
        let source = self.vault.active_document();
        let source_path = source.as_ref().map(VaultFile::path).unwrap_or("");
        if let Some(file) = self.vault.resolve_link(name, source_path).await {
            return Some(file);
        }

        let wanted = name.rsplit('/').next().unwrap_or(name);
        let found = self.vault.list_files().await.into_iter().find(|file| {
            file.name() == wanted || (file.is_markdown() && file.stem() == wanted)
        });
        if let Some(file) = &found {
            debug!("Resolved {} by file name to {}", name, file.path());
        }
        found
    }

    async fn note_reference(&self, file: &VaultFile) -> PublishResult<Block> {
        let text = self
            .vault
            .read_text(file)
            .await
            .map_err(|e| PublishError::UnresolvedReference(format!("{}: {}", file.path(), e)))?;

        read_identity(&text, &self.identity_key, self.legacy_key_fallback)
            .map(|remote_id| Block::EmbeddedNote { remote_id })
            .ok_or_else(|| PublishError::UnpublishedNote(file.path().to_string()))
    }

    async fn upload(&self, file: &VaultFile) -> PublishResult<Block> {
        let extension = file.extension();
        let bytes = self
            .vault
            .read_binary(file)
            .await
            .map_err(|e| PublishError::UnresolvedReference(format!("{}: {}", file.path(), e)))?;

        let authorization = self
            .client
            .prepare_upload(MediaType::from_extension(&extension))
            .await?;
        let asset_id = self
            .client
            .deliver(
                authorization,
                file.name(),
                bytes,
                mime_for_extension(&extension),
            )
            .await?;

        Ok(Block::image(asset_id, file.name()))
    }
}

#[async_trait]
impl<V: Vault + ?Sized> EmbedResolver for AssetPipeline<V> {
    async fn resolve(&self, embed: &EmbedReference) -> Block {
        self.resolve_and_upload(embed).await
    }
}
