use anyhow::{bail, Context, Result};
use colored::Colorize;
use quill_config::QuillConfig;
use quill_core::{Vault, VisibilitySettings};
use quill_parser::{extract_tags, read_mirrored_settings};
use quill_publish::{FsVault, PublishRequest, Publisher, PublisherSettings};
use std::sync::Arc;
use tracing::debug;

use crate::cli::PublishArgs;

/// Publish one note.
///
/// Unset options fall back to the note itself (frontmatter tags, then the
/// settings mirrored by the last publish) and finally to the config.
pub async fn execute(config: QuillConfig, args: PublishArgs) -> Result<()> {
    let path = args
        .file
        .canonicalize()
        .with_context(|| format!("Cannot open {}", args.file.display()))?;
    let root = match &args.vault {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Cannot open vault {}", dir.display()))?,
        None => path
            .parent()
            .map(|p| p.to_path_buf())
            .context("Note has no parent directory")?,
    };

    let vault = FsVault::new(&root);
    let active = vault
        .file_for(&path)
        .with_context(|| format!("{} is not inside {}", path.display(), root.display()))?;
    let vault = Arc::new(vault.with_active(active.clone()));
    let text = vault
        .read_text(&active)
        .await
        .with_context(|| format!("Failed to read {}", active.path()))?;

    let previous = read_mirrored_settings(&text);
    let tags_csv = match args.tags {
        Some(tags) => tags,
        None => {
            let mut tags = extract_tags(&text);
            if tags.is_empty() {
                tags = previous.as_ref().map(|p| p.tags.clone()).unwrap_or_default();
            }
            tags.join(",")
        }
    };
    let auto_publish = args
        .auto_publish
        .or_else(|| previous.as_ref().map(|p| p.auto_publish))
        .unwrap_or(config.auto_publish);
    let visibility = match args.privacy {
        Some(privacy) => VisibilitySettings::restricted(
            privacy.to_privacy(args.no_share, args.expire_at.unwrap_or(0)),
        ),
        None => previous
            .as_ref()
            .and_then(|p| p.privacy)
            .map(VisibilitySettings::restricted)
            .unwrap_or_default(),
    };

    let request = PublishRequest {
        title: args.title.unwrap_or_else(|| active.stem().to_string()),
        text,
        tags_csv,
        auto_publish,
        visibility,
        write_identity_back: config.write_identity_back && !args.no_write_back,
        summary: args.summary,
    };
    debug!(
        "Publishing {} (tags: {}, auto publish: {})",
        active.path(),
        request.tags_csv,
        request.auto_publish
    );

    let publisher = Publisher::new(vault, PublisherSettings::from_config(&config));
    let outcome = publisher.publish(&request).await;

    for warning in &outcome.warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    if !outcome.success {
        if let Some(payload) = &outcome.payload {
            debug!("Server response: {}", payload);
        }
        bail!("Publish failed: {}", outcome.message);
    }

    println!("{} {}", "Success:".green().bold(), outcome.message);
    Ok(())
}
