use anyhow::{Context, Result};
use colored::Colorize;
use quill_config::{mask_api_key, resolve_api_key, ConfigLoader, QuillConfig};
use std::path::PathBuf;

/// Show the effective configuration with the API key masked
pub fn show(config: QuillConfig, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(ConfigLoader::default_path);
    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("{} {}{}", "Config file:".bold(), path.display(), status.dimmed());

    match resolve_api_key(&config) {
        Some((key, source)) => println!(
            "{} {} (from {})",
            "API key:".bold(),
            mask_api_key(&key),
            source
        ),
        None => println!("{} {}", "API key:".bold(), "not configured".red()),
    }

    let shown = QuillConfig {
        api_key: None,
        ..config
    };
    println!();
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

/// Write a config file holding the default values
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(ConfigLoader::default_path);

    if path.exists() && !force {
        println!(
            "{} Config file already exists at: {}",
            "Error:".red().bold(),
            path.display()
        );
        println!("Use {} to overwrite", "--force".yellow());
        return Ok(());
    }

    ConfigLoader::save(&QuillConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        path.display()
    );
    println!(
        "{}",
        "Set api_key here or export QUILL_API_KEY.".dimmed()
    );
    Ok(())
}
