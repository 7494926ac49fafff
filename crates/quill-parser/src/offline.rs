//! Resolver that never touches the network or the vault

use async_trait::async_trait;
use quill_core::{Block, EmbedReference, EmbedResolver};

/// Renders embeds without uploading anything.
///
/// Asset embeds and remote images become legacy single-line images pointing
/// at the original name; note embeds cannot be linked without a lookup, so
/// they stay as literal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

#[async_trait]
impl EmbedResolver for OfflineResolver {
    async fn resolve(&self, embed: &EmbedReference) -> Block {
        if embed.is_remote() {
            return Block::legacy_image(embed.name());
        }
        match embed.extension() {
            Some(ext) if ext != "md" => Block::legacy_image(embed.name()),
            _ => Block::raw_text(&embed.raw),
        }
    }
}
