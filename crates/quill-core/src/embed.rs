//! Embed references extracted from source lines

/// Which source syntax produced an [`EmbedReference`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedSyntax {
    /// `![[name]]` transclusion
    Embed,
    /// `[[name]]` wikilink standing alone on a line
    Wikilink,
    /// `![alt](target)` standard markdown image
    MarkdownImage,
}

/// A reference to another vault file or note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    /// The original source text, used verbatim for fallback blocks
    pub raw: String,
    /// Link target as written, without alias
    pub target: String,
    /// Alias / display text / size hint after `|`, or markdown alt text
    pub alias: Option<String>,
    /// Source syntax
    pub syntax: EmbedSyntax,
}

impl EmbedReference {
    /// Create a reference
    pub fn new(
        raw: impl Into<String>,
        target: impl Into<String>,
        alias: Option<String>,
        syntax: EmbedSyntax,
    ) -> Self {
        Self {
            raw: raw.into(),
            target: target.into(),
            alias,
            syntax,
        }
    }

    /// Name used for file lookup: the target without any `#heading` or
    /// `#^block` suffix
    pub fn name(&self) -> &str {
        if self.is_remote() {
            return &self.target;
        }
        match self.target.split_once('#') {
            Some((name, _)) if !name.is_empty() => name.trim(),
            _ => self.target.trim(),
        }
    }

    /// Whether the target is an `http(s)` URL rather than a vault file
    pub fn is_remote(&self) -> bool {
        let lower = self.target.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Lowercased extension of the lookup name, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.name();
        let file = name.rsplit('/').next().unwrap_or(name);
        file.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
