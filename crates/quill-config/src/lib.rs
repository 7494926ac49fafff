//! Quill configuration
//!
//! Typed settings loaded from `$XDG_CONFIG_HOME/quill/config.toml`, with
//! environment overrides and API key resolution.
//!
//! ```toml
//! # ~/.config/quill/config.toml
//! api_key = "..."
//! note_id_key = "mowenId"
//! default_tag = "Obsidian"
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod loader;

pub use config::{QuillConfig, DEFAULT_BASE_URL, DEFAULT_TAG, DEFAULT_TIMEOUT_SECS};
pub use credentials::{mask_api_key, resolve_api_key, CredentialSource, API_KEY_ENV};
pub use loader::{ConfigError, ConfigLoader, ConfigResult, BASE_URL_ENV};
