//! Inline formatting: `[label](url)` links and `**bold**` spans
//!
//! Links are found first, left to right. Text before each link and after the
//! last one is split on `**` toggles. A dangling `**` leaves the rest of that
//! span bold. Links are rendered emphasized: link, bold and highlight marks,
//! in that order.

use quill_core::{Mark, TextRun};
use regex::Regex;
use std::sync::LazyLock;

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex"));

const BOLD_MARKER: &str = "**";

/// Split one line into formatted runs. Returns no runs for an empty line.
pub fn parse_inline(line: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for cap in LINK_REGEX.captures_iter(line) {
        let whole = match cap.get(0) {
            Some(m) => m,
            None => continue,
        };
        if whole.start() > last {
            push_bold_spans(&line[last..whole.start()], &mut runs);
        }
        runs.push(link_run(&cap[1], &cap[2]));
        last = whole.end();
    }

    if last < line.len() {
        push_bold_spans(&line[last..], &mut runs);
    }

    runs
}

fn link_run(label: &str, href: &str) -> TextRun {
    TextRun::plain(label)
        .with_mark(Mark::Link {
            href: href.trim().to_string(),
        })
        .with_mark(Mark::Bold)
        .with_mark(Mark::Highlight)
}

fn push_bold_spans(text: &str, runs: &mut Vec<TextRun>) {
    let mut bold = false;
    let mut rest = text;

    while let Some(idx) = rest.find(BOLD_MARKER) {
        push_span(&rest[..idx], bold, runs);
        bold = !bold;
        rest = &rest[idx + BOLD_MARKER.len()..];
    }
    push_span(rest, bold, runs);
}

fn push_span(text: &str, bold: bool, runs: &mut Vec<TextRun>) {
    if text.is_empty() {
        return;
    }
    runs.push(if bold {
        TextRun::bold(text)
    } else {
        TextRun::plain(text)
    });
}
