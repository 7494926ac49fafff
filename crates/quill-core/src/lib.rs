//! # Quill Core
//!
//! Shared types and abstractions for the Quill publishing pipeline:
//!
//! - [`document`]: the remote document tree (blocks, text runs, marks) and its
//!   JSON wire rendering
//! - [`privacy`]: visibility section and privacy settings sent alongside a note
//! - [`embed`]: embed references extracted from source text
//! - [`traits`]: collaborator seams ([`EmbedResolver`], [`Vault`]) implemented by
//!   higher-level crates
//!
//! This crate performs no I/O. The parser depends on it for the model and the
//! resolver seam; the publish crate implements the seams.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod embed;
pub mod privacy;
pub mod traits;

pub use document::{Align, Block, Document, Mark, TextRun};
pub use embed::{EmbedReference, EmbedSyntax};
pub use privacy::{Privacy, Section, VisibilitySettings};
pub use traits::{EmbedResolver, Vault, VaultError, VaultFile, VaultResult};
