//! API key resolution
//!
//! [`resolve_api_key`] checks, in order:
//! 1. `QUILL_API_KEY`
//! 2. `api_key` in the config file
//!
//! Blank values count as missing.

use crate::config::QuillConfig;
use tracing::debug;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "QUILL_API_KEY";

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// From the environment
    EnvVar,
    /// From the config file
    Config,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::EnvVar => write!(f, "env"),
            CredentialSource::Config => write!(f, "config"),
        }
    }
}

/// Resolve the API key
pub fn resolve_api_key(config: &QuillConfig) -> Option<(String, CredentialSource)> {
    if let Ok(value) = std::env::var(API_KEY_ENV) {
        let value = value.trim();
        if !value.is_empty() {
            debug!("Resolved API key from env var {}", API_KEY_ENV);
            return Some((value.to_string(), CredentialSource::EnvVar));
        }
    }

    if let Some(key) = config.api_key.as_deref().map(str::trim) {
        if !key.is_empty() {
            debug!("Resolved API key from config");
            return Some((key.to_string(), CredentialSource::Config));
        }
    }

    None
}

/// Mask a key for display, keeping the last four characters
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
