use anyhow::{bail, Context, Result};
use quill_config::QuillConfig;
use quill_parser::read_identity;
use std::path::PathBuf;

/// Print the stored remote identifier; fails when the note has none
pub async fn execute(config: QuillConfig, file: PathBuf) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match read_identity(&text, config.note_id_key(), config.legacy_key_fallback) {
        Some(id) => {
            println!("{id}");
            Ok(())
        }
        None => bail!("{} has not been published", file.display()),
    }
}
