//! Quill Markdown Parser
//!
//! Converts an Obsidian-style markdown note into the remote document tree and
//! manages the identity stored in the note's frontmatter.
//! This crate provides:
//! - A line-oriented converter with explicit header / quote / code-fence state
//! - Inline bold and link scanning
//! - Embed line recognition (`![[file]]`, `[[note]]`, `![alt](path)`)
//! - Frontmatter identity read / merge-patch write and tag extraction

pub mod converter;
pub mod embeds;
pub mod error;
pub mod frontmatter;
pub mod inline;
pub mod offline;

pub use converter::{convert, LineMachine, LineState};
pub use embeds::parse_embed_line;
pub use error::{FrontmatterError, FrontmatterResult};
pub use frontmatter::{
    extract_tags, read_identity, read_mirrored_settings, split_frontmatter, write_identity,
    MirroredSettings, DEFAULT_IDENTITY_KEY, HEADER_DELIMITER,
};
pub use inline::parse_inline;
pub use offline::OfflineResolver;
