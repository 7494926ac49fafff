use anyhow::{Context, Result};
use quill_parser::{convert, OfflineResolver};
use std::path::PathBuf;

/// Print the note body as it would be sent, with embeds rendered offline
pub async fn execute(file: PathBuf, title: Option<String>, summary: Option<String>) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let document = convert(&OfflineResolver, &title, &text, summary.as_deref()).await;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
