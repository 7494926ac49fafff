//! Markdown to remote document conversion
//!
//! Conversion is a single pass over the source lines driven by [`LineMachine`],
//! an explicit state enum plus a quote buffer. Embed lines are the only lines
//! that need I/O; the machine hands them back to [`convert`], which awaits the
//! resolver in document order and pushes the resulting block in place.
//!
//! Line rules, in precedence order (lines are trimmed first):
//! 1. `---` toggles the metadata header; lines inside it are dropped
//! 2. a line made of ```` ``` ```` alone toggles the code fence; fenced lines
//!    are emitted verbatim, one paragraph each, with no spacers
//! 3. `>` lines accumulate into one quote, flushed (quote + spacer) by the
//!    first line that is not a quote line
//! 4. embed lines go to the resolver and yield exactly one block
//! 5. `#` headings yield a heading block
//! 6. any other non-blank line yields a paragraph of inline runs + spacer
//! 7. blank lines yield nothing

use crate::embeds::parse_embed_line;
use crate::frontmatter::HEADER_DELIMITER;
use crate::inline::parse_inline;
use quill_core::{Block, Document, EmbedReference, EmbedResolver, TextRun};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const FENCE_MARKER: &str = "```";
const QUOTE_MARKER: char = '>';

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s+(.+)$").expect("heading regex"));

/// Converter state between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    /// Ordinary content
    #[default]
    Normal,
    /// Between two header delimiters
    InMetadataHeader,
    /// Accumulating consecutive quote lines
    InQuote,
    /// Between two code fence markers
    InCodeFence,
}

/// Line-oriented state machine that builds the block list.
///
/// Feed lines in order with [`LineMachine::feed`]. When a line is an embed,
/// `feed` returns the reference and the caller must push exactly one block
/// for it (via [`LineMachine::push`]) before feeding the next line.
#[derive(Debug, Default)]
pub struct LineMachine {
    state: LineState,
    quote: Vec<String>,
    blocks: Vec<Block>,
}

impl LineMachine {
    /// Create a machine in the `Normal` state with no output
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Blocks emitted so far
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append a block produced outside the machine (title, summary, embed)
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Process one source line
    pub fn feed(&mut self, raw: &str) -> Option<EmbedReference> {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let line = raw.trim();

        if line == HEADER_DELIMITER {
            self.flush_quote();
            self.state = match self.state {
                LineState::InMetadataHeader => LineState::Normal,
                _ => LineState::InMetadataHeader,
            };
            return None;
        }
        if self.state == LineState::InMetadataHeader {
            return None;
        }

        if self.state == LineState::InCodeFence {
            if line == FENCE_MARKER {
                self.blocks.push(Block::text(line));
                self.blocks.push(Block::spacer());
                self.state = LineState::Normal;
            } else {
                self.push_verbatim(raw.trim_end());
            }
            return None;
        }

        if let Some(rest) = line.strip_prefix(QUOTE_MARKER) {
            self.quote.push(rest.trim().to_string());
            self.state = LineState::InQuote;
            return None;
        }
        self.flush_quote();

        if line == FENCE_MARKER {
            self.blocks.push(Block::text(line));
            self.state = LineState::InCodeFence;
            return None;
        }

        if line.is_empty() {
            return None;
        }

        if let Some(embed) = parse_embed_line(line) {
            return Some(embed);
        }

        if let Some(cap) = HEADING_REGEX.captures(line) {
            let text = cap[1].trim_end_matches('#').trim();
            if !text.is_empty() {
                self.blocks.push(Block::Heading {
                    text: text.to_string(),
                });
                return None;
            }
        }

        let runs = parse_inline(line);
        if !runs.is_empty() {
            self.blocks.push(Block::paragraph(runs));
            self.blocks.push(Block::spacer());
        }
        None
    }

    /// Flush any pending quote and return the finished blocks
    pub fn finish(mut self) -> Vec<Block> {
        self.flush_quote();
        self.blocks
    }

    fn push_verbatim(&mut self, line: &str) {
        if line.is_empty() {
            self.blocks.push(Block::spacer());
        } else {
            self.blocks.push(Block::paragraph(vec![TextRun::plain(line)]));
        }
    }

    fn flush_quote(&mut self) {
        if self.state != LineState::InQuote {
            return;
        }
        let text = self.quote.join("\n");
        self.quote.clear();
        self.blocks.push(Block::Quote { text });
        self.blocks.push(Block::spacer());
        self.state = LineState::Normal;
    }
}

/// Convert a markdown note into the remote document.
///
/// The title is always the first block (bold paragraph). A non-blank summary
/// follows as a quote plus spacer. Embeds are resolved one at a time, in
/// source order. Never fails: the resolver degrades unresolvable embeds.
pub async fn convert<R>(
    resolver: &R,
    title: &str,
    markdown: &str,
    summary: Option<&str>,
) -> Document
where
    R: EmbedResolver + ?Sized,
{
    let mut machine = LineMachine::new();
    machine.push(Block::paragraph(vec![TextRun::bold(title.trim())]));

    if let Some(summary) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        machine.push(Block::Quote {
            text: summary.to_string(),
        });
        machine.push(Block::spacer());
    }

    let mut embeds = 0usize;
    for line in markdown.split('\n') {
        if let Some(embed) = machine.feed(line) {
            embeds += 1;
            debug!("Resolving embed {}", embed.raw);
            let block = resolver.resolve(&embed).await;
            machine.push(block);
        }
    }

    let document = Document::from_blocks(machine.finish());
    debug!(
        "Converted '{}' into {} blocks ({} embeds)",
        title,
        document.len(),
        embeds
    );
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> Vec<Block> {
        let mut machine = LineMachine::new();
        for line in lines {
            assert!(machine.feed(line).is_none());
        }
        machine.finish()
    }

    #[test]
    fn test_header_toggle() {
        let mut machine = LineMachine::new();
        machine.feed("---");
        assert_eq!(machine.state(), LineState::InMetadataHeader);
        machine.feed("noteId: abc");
        assert!(machine.blocks().is_empty());
        machine.feed("---");
        assert_eq!(machine.state(), LineState::Normal);
    }

    #[test]
    fn test_quote_flushes_on_content() {
        let blocks = run(&["> one", "> two", "after"]);
        assert_eq!(
            blocks[0],
            Block::Quote {
                text: "one\ntwo".to_string()
            }
        );
        assert!(blocks[1].is_spacer());
        assert_eq!(blocks[2], Block::text("after"));
    }

    #[test]
    fn test_quote_flushes_at_end_of_input() {
        let blocks = run(&["> tail"]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Quote {
                text: "tail".to_string()
            }
        );
    }

    #[test]
    fn test_code_fence_is_verbatim() {
        let blocks = run(&["```", "let x = **y**;", "", "    [a](b)", "```"]);
        assert_eq!(blocks[0], Block::text("```"));
        assert_eq!(blocks[1], Block::text("let x = **y**;"));
        assert!(blocks[2].is_spacer());
        assert_eq!(blocks[3], Block::text("    [a](b)"));
        assert_eq!(blocks[4], Block::text("```"));
        assert!(blocks[5].is_spacer());
        assert_eq!(blocks.len(), 6);
    }

    #[test]
    fn test_fence_with_language_is_text() {
        let mut machine = LineMachine::new();
        machine.feed("```rust");
        assert_eq!(machine.state(), LineState::Normal);
        machine.feed("**x**");
        let blocks = machine.finish();
        assert_eq!(blocks[0], Block::text("```rust"));
        assert!(blocks[1].is_spacer());
        assert_ne!(blocks[2], Block::text("**x**"));
    }

    #[test]
    fn test_header_delimiter_inside_fence_toggles_header() {
        let mut machine = LineMachine::new();
        machine.feed("```");
        machine.feed("---");
        assert_eq!(machine.state(), LineState::InMetadataHeader);
    }

    #[test]
    fn test_heading() {
        let blocks = run(&["## Section ##"]);
        assert_eq!(
            blocks,
            vec![Block::Heading {
                text: "Section".to_string()
            }]
        );
    }

    #[test]
    fn test_hashtag_line_is_text() {
        let blocks = run(&["#tag"]);
        assert_eq!(blocks[0], Block::text("#tag"));
    }

    #[test]
    fn test_embed_is_returned_to_caller() {
        let mut machine = LineMachine::new();
        let embed = machine.feed("![[pic.png]]").unwrap();
        assert_eq!(embed.name(), "pic.png");
        assert!(machine.blocks().is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = run(&["---\r", "a: b\r", "---\r", "text\r"]);
        assert_eq!(blocks[0], Block::text("text"));
    }
}
