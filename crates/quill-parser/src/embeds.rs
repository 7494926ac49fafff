//! Embed line recognition
//!
//! A line that consists solely of one of these forms becomes an embed:
//! - `![[file.png]]`, `![[file.png|300]]` (transclusion)
//! - `[[Other Note]]`, `[[Other Note#Heading|alias]]` (wikilink on its own line)
//! - `![alt](path/to/file.png)` (standard markdown image)
//!
//! Wikilinks inside running text are left to the inline scanner.

use quill_core::{EmbedReference, EmbedSyntax};
use regex::Regex;
use std::sync::LazyLock;

static WIKI_EMBED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(!?)\[\[([^\[\]]+)\]\]$").expect("wiki embed regex"));

static MARKDOWN_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*<?([^()<>\s]+)>?(?:\s+"[^"]*")?\s*\)$"#)
        .expect("markdown image regex")
});

/// Recognize a whole (trimmed) line as an embed reference
pub fn parse_embed_line(line: &str) -> Option<EmbedReference> {
    let line = line.trim();

    if let Some(cap) = WIKI_EMBED_REGEX.captures(line) {
        let is_embed = !cap[1].is_empty();
        let inner = &cap[2];
        let (target, alias) = match inner.split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim().to_string())),
            None => (inner.trim(), None),
        };
        if target.is_empty() {
            return None;
        }
        let syntax = if is_embed {
            EmbedSyntax::Embed
        } else {
            EmbedSyntax::Wikilink
        };
        return Some(EmbedReference::new(line, target, alias, syntax));
    }

    if let Some(cap) = MARKDOWN_IMAGE_REGEX.captures(line) {
        let alt = cap[1].trim().to_string();
        let target = cap[2].replace("%20", " ");
        return Some(EmbedReference::new(
            line,
            target,
            Some(alt),
            EmbedSyntax::MarkdownImage,
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transclusion() {
        let embed = parse_embed_line("![[diagram.png]]").unwrap();
        assert_eq!(embed.syntax, EmbedSyntax::Embed);
        assert_eq!(embed.name(), "diagram.png");
        assert_eq!(embed.raw, "![[diagram.png]]");
        assert_eq!(embed.alias, None);
    }

    #[test]
    fn test_wikilink_with_alias_and_heading() {
        let embed = parse_embed_line("  [[Weekly Review#Wins|wins]]  ").unwrap();
        assert_eq!(embed.syntax, EmbedSyntax::Wikilink);
        assert_eq!(embed.target, "Weekly Review#Wins");
        assert_eq!(embed.name(), "Weekly Review");
        assert_eq!(embed.alias.as_deref(), Some("wins"));
        assert_eq!(embed.raw, "[[Weekly Review#Wins|wins]]");
    }

    #[test]
    fn test_markdown_image() {
        let embed = parse_embed_line("![A cat](assets/my%20cat.jpg)").unwrap();
        assert_eq!(embed.syntax, EmbedSyntax::MarkdownImage);
        assert_eq!(embed.name(), "assets/my cat.jpg");
        assert_eq!(embed.alias.as_deref(), Some("A cat"));

        let titled = parse_embed_line(r#"![](https://example.com/x.png "title")"#).unwrap();
        assert!(titled.is_remote());
    }

    #[test]
    fn test_inline_references_are_not_embeds() {
        assert!(parse_embed_line("see [[Other]] for more").is_none());
        assert!(parse_embed_line("![[a.png]] caption").is_none());
        assert!(parse_embed_line("[label](https://example.com)").is_none());
        assert!(parse_embed_line("[[]]").is_none());
        assert!(parse_embed_line("[[ | alias]]").is_none());
    }
}
