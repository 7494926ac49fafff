//! Remote document tree
//!
//! A [`Document`] is an ordered list of [`Block`]s. The remote schema is a closed
//! set of node types, so blocks and marks are plain enums; the wire shape
//! (`{"type": "doc", "content": [...]}`) is produced by the `Serialize` impls
//! below rather than by mirroring the JSON in the Rust types.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Inline formatting applied to a [`TextRun`].
///
/// Marks are rendered in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", content = "attrs", rename_all = "lowercase")]
pub enum Mark {
    /// Bold text
    Bold,
    /// Hyperlink
    Link {
        /// Link target
        href: String,
    },
    /// Highlighted text
    Highlight,
    /// Legacy single-line image form, referencing the image by source string
    Image {
        /// Image source (file name or URL)
        src: String,
    },
}

/// A span of text with zero or more marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Literal text
    pub text: String,
    /// Marks in insertion order
    pub marks: Vec<Mark>,
}

impl TextRun {
    /// Unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Run carrying a single bold mark
    pub fn bold(text: impl Into<String>) -> Self {
        Self::plain(text).with_mark(Mark::Bold)
    }

    /// Append a mark, keeping insertion order
    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    /// Whether the run carries the given mark
    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    /// Whether the run is bold
    pub fn is_bold(&self) -> bool {
        self.has_mark(&Mark::Bold)
    }

    /// The link target, if the run is a link
    pub fn href(&self) -> Option<&str> {
        self.marks.iter().find_map(|m| match m {
            Mark::Link { href } => Some(href.as_str()),
            _ => None,
        })
    }
}

impl Serialize for TextRun {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.marks.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("TextRun", fields)?;
        state.serialize_field("type", "text")?;
        state.serialize_field("text", &self.text)?;
        if !self.marks.is_empty() {
            state.serialize_field("marks", &self.marks)?;
        }
        state.end()
    }
}

/// Horizontal alignment of an image block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left aligned
    Left,
    /// Centered (the default for uploaded assets)
    #[default]
    Center,
    /// Right aligned
    Right,
}

/// A top-level node of the remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Paragraph of text runs; an empty paragraph acts as a vertical spacer
    Paragraph {
        /// Runs in reading order
        runs: Vec<TextRun>,
    },
    /// Block quote; multiple source lines are joined with `\n`
    Quote {
        /// Quote text
        text: String,
    },
    /// Heading text, rendered remotely as a bold paragraph
    Heading {
        /// Heading text without the `#` prefix
        text: String,
    },
    /// Uploaded image asset
    Image {
        /// Remote asset identifier returned by the upload endpoint
        asset_id: String,
        /// Alignment
        align: Align,
        /// Alternate text (the source file name)
        alt: String,
    },
    /// Reference to another already-published note
    EmbeddedNote {
        /// Remote note identifier
        remote_id: String,
    },
    /// Literal fallback text, used when an embed cannot be resolved
    RawText {
        /// Original source text
        text: String,
    },
}

impl Block {
    /// Empty spacer paragraph
    pub fn spacer() -> Self {
        Block::Paragraph { runs: Vec::new() }
    }

    /// Paragraph from runs
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Block::Paragraph { runs }
    }

    /// Paragraph holding a single unformatted run
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Literal fallback block
    pub fn raw_text(text: impl Into<String>) -> Self {
        Block::RawText { text: text.into() }
    }

    /// Legacy single-line image: a paragraph whose only run carries an
    /// [`Mark::Image`] pointing at `src`
    pub fn legacy_image(src: impl Into<String>) -> Self {
        let src = src.into();
        Block::Paragraph {
            runs: vec![TextRun::plain(src.clone()).with_mark(Mark::Image { src })],
        }
    }

    /// Centered image block for an uploaded asset
    pub fn image(asset_id: impl Into<String>, alt: impl Into<String>) -> Self {
        Block::Image {
            asset_id: asset_id.into(),
            align: Align::Center,
            alt: alt.into(),
        }
    }

    /// Whether this is an empty spacer paragraph
    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Paragraph { runs } if runs.is_empty())
    }
}

#[derive(serde::Serialize)]
struct ImageAttrs<'a> {
    uuid: &'a str,
    align: Align,
    alt: &'a str,
}

#[derive(serde::Serialize)]
struct NoteAttrs<'a> {
    uuid: &'a str,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Paragraph { runs } if runs.is_empty() => {
                let mut state = serializer.serialize_struct("Block", 1)?;
                state.serialize_field("type", "paragraph")?;
                state.end()
            }
            Block::Paragraph { runs } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "paragraph")?;
                state.serialize_field("content", runs)?;
                state.end()
            }
            Block::Quote { text } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "quote")?;
                state.serialize_field("content", &[TextRun::plain(text.as_str())])?;
                state.end()
            }
            Block::Heading { text } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "paragraph")?;
                state.serialize_field("content", &[TextRun::bold(text.as_str())])?;
                state.end()
            }
            Block::Image {
                asset_id,
                align,
                alt,
            } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "image")?;
                state.serialize_field(
                    "attrs",
                    &ImageAttrs {
                        uuid: asset_id,
                        align: *align,
                        alt,
                    },
                )?;
                state.end()
            }
            Block::EmbeddedNote { remote_id } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "note")?;
                state.serialize_field("attrs", &NoteAttrs { uuid: remote_id })?;
                state.end()
            }
            Block::RawText { text } => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "paragraph")?;
                state.serialize_field("content", &[TextRun::plain(text.as_str())])?;
                state.end()
            }
        }
    }
}

/// Ordered block tree sent as a note body.
///
/// Built fresh on every conversion; never persisted locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Blocks in source order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Append a block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate blocks that are not spacers
    pub fn content_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.is_spacer())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Document", 2)?;
        state.serialize_field("type", "doc")?;
        state.serialize_field("content", &self.blocks)?;
        state.end()
    }
}
