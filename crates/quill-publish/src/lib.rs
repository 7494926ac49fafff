//! Quill publishing
//!
//! Talks to the remote note service and drives a publish end to end:
//!
//! - [`client`]: create/edit, visibility and two-phase upload calls
//! - [`assets`]: embed resolution against a [`quill_core::Vault`] with upload
//! - [`publisher`]: the publish lifecycle and its [`PublishOutcome`]
//! - [`vault_fs`]: a directory-backed vault for the CLI

#![warn(missing_docs)]

pub mod assets;
pub mod client;
pub mod error;
pub mod media;
pub mod publisher;
pub mod tags;
pub mod vault_fs;

pub use assets::AssetPipeline;
pub use client::{NoteClient, NoteSettings, UploadAuthorization};
pub use error::{PublishError, PublishResult};
pub use media::{mime_for_extension, MediaType};
pub use publisher::{PublishOutcome, PublishRequest, PublishStage, Publisher, PublisherSettings};
pub use tags::normalize_tags;
pub use vault_fs::FsVault;
