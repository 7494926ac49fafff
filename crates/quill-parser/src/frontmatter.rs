//! Frontmatter identity store
//!
//! The metadata header is a YAML mapping delimited by `---` lines at the very
//! top of a note. It carries the remote note identifier under a configurable
//! key, plus a few mirrored publish settings under `quill-*` keys.
//!
//! Writes are a merge-patch. The whole mapping is parsed to validate it, but
//! only the owned keys (identity and `quill-*`) are serialized; every other
//! top-level entry is re-emitted from its source lines, so comments, quoting
//! and flow style survive. Reads prefer the parsed mapping and fall back to
//! line-anchored pattern matching when the header is not valid YAML.

use crate::error::{FrontmatterError, FrontmatterResult};
use quill_core::Privacy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

/// Line that opens and closes the header
pub const HEADER_DELIMITER: &str = "---";

/// Default key holding the remote identifier
pub const DEFAULT_IDENTITY_KEY: &str = "noteId";

const TAGS_KEY: &str = "quill-tags";
const AUTO_PUBLISH_KEY: &str = "quill-auto-publish";
const PRIVACY_KEY: &str = "quill-privacy";
const NO_SHARE_KEY: &str = "quill-no-share";
const EXPIRE_AT_KEY: &str = "quill-expire-at";

const MIRRORED_KEYS: [&str; 5] = [
    TAGS_KEY,
    AUTO_PUBLISH_KEY,
    PRIVACY_KEY,
    NO_SHARE_KEY,
    EXPIRE_AT_KEY,
];

/// Key of a top-level `key: value` line, plain or quoted
static TOP_LEVEL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"([^"\\]*)"|'([^']*)'|([^\s#'"\-][^:#]*?))[ \t]*:(?:\s|$)"#)
        .expect("top-level key regex")
});

/// Byte ranges of the header inside a document
struct HeaderSpan {
    /// YAML between the delimiter lines
    yaml: Range<usize>,
    /// First byte after the closing delimiter line
    body_start: usize,
}

/// Find the header. `Ok(None)` when the document does not open with a
/// delimiter line; `Err(Unterminated)` when it opens one but never closes it.
fn locate_header(text: &str) -> FrontmatterResult<Option<HeaderSpan>> {
    let first_end = match text.find('\n') {
        Some(idx) => idx,
        None => return Ok(None),
    };
    if text[..first_end].trim_end() != HEADER_DELIMITER {
        return Ok(None);
    }

    let yaml_start = first_end + 1;
    let mut line_start = yaml_start;
    while line_start <= text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map(|idx| line_start + idx)
            .unwrap_or(text.len());
        if text[line_start..line_end].trim_end() == HEADER_DELIMITER {
            let body_start = (line_end + 1).min(text.len());
            return Ok(Some(HeaderSpan {
                yaml: yaml_start..line_start,
                body_start,
            }));
        }
        if line_end == text.len() {
            break;
        }
        line_start = line_end + 1;
    }

    Err(FrontmatterError::Unterminated)
}

/// Split a document into its raw header YAML and body.
///
/// Documents without a well-formed header return `(None, text)`.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    match locate_header(text) {
        Ok(Some(span)) => (Some(&text[span.yaml]), &text[span.body_start..]),
        _ => (None, text),
    }
}

fn parse_mapping(yaml: &str) -> FrontmatterResult<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

fn parse_header(text: &str) -> FrontmatterResult<Option<Mapping>> {
    match locate_header(text)? {
        Some(span) => parse_mapping(&text[span.yaml]).map(Some),
        None => Ok(None),
    }
}

fn normalize_key(key: &str) -> &str {
    let key = key.trim();
    if key.is_empty() {
        DEFAULT_IDENTITY_KEY
    } else {
        key
    }
}

fn identity_keys(key: &str, legacy_fallback: bool) -> Vec<&str> {
    let key = normalize_key(key);
    let mut keys = vec![key];
    if legacy_fallback && key != DEFAULT_IDENTITY_KEY {
        keys.push(DEFAULT_IDENTITY_KEY);
    }
    keys
}

fn identity_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn match_identity(haystack: &str, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let pattern = format!(
            r#"(?m)^[ \t]*{}[ \t]*:[ \t]*["']?([^\s"'#]+)"#,
            regex::escape(key)
        );
        let re = Regex::new(&pattern).ok()?;
        re.captures(haystack)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Read the stored remote identifier.
///
/// Checks `key` first, then the default key when `legacy_fallback` is set and
/// `key` differs from it. A malformed header is searched line by line, then
/// the whole document is searched as a last resort. Documents without a
/// header have no identity.
pub fn read_identity(text: &str, key: &str, legacy_fallback: bool) -> Option<String> {
    let keys = identity_keys(key, legacy_fallback);

    match locate_header(text) {
        Ok(None) => None,
        Ok(Some(span)) => {
            let yaml = &text[span.yaml];
            match parse_mapping(yaml) {
                Ok(map) => keys
                    .iter()
                    .find_map(|k| map.get(*k).and_then(identity_value)),
                Err(err) => {
                    debug!("{err}; matching identity key by pattern");
                    match_identity(yaml, &keys).or_else(|| match_identity(text, &keys))
                }
            }
        }
        Err(err) => {
            debug!("{err}; matching identity key across the document");
            match_identity(text, &keys)
        }
    }
}

/// Publish settings mirrored into the header next to the identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirroredSettings {
    /// Tags sent with the last publish
    pub tags: Vec<String>,
    /// Auto-publish flag of the last publish
    pub auto_publish: bool,
    /// Privacy of the restricted section, `None` for the default section
    pub privacy: Option<Privacy>,
}

impl MirroredSettings {
    fn apply(&self, map: &mut Mapping) {
        map.insert(
            Value::from(TAGS_KEY),
            Value::Sequence(self.tags.iter().map(|t| Value::from(t.as_str())).collect()),
        );
        map.insert(Value::from(AUTO_PUBLISH_KEY), Value::Bool(self.auto_publish));

        match self.privacy {
            Some(privacy) => {
                map.insert(Value::from(PRIVACY_KEY), Value::from(privacy.kind()));
                if let Privacy::Rule {
                    no_share,
                    expire_at,
                } = privacy
                {
                    map.insert(Value::from(NO_SHARE_KEY), Value::Bool(no_share));
                    map.insert(Value::from(EXPIRE_AT_KEY), Value::from(expire_at));
                } else {
                    map.shift_remove(NO_SHARE_KEY);
                    map.shift_remove(EXPIRE_AT_KEY);
                }
            }
            None => {
                map.shift_remove(PRIVACY_KEY);
                map.shift_remove(NO_SHARE_KEY);
                map.shift_remove(EXPIRE_AT_KEY);
            }
        }
    }

    fn from_mapping(map: &Mapping) -> Option<Self> {
        let tags = map.get(TAGS_KEY).map(tag_list);
        let auto_publish = map.get(AUTO_PUBLISH_KEY).and_then(Value::as_bool);
        let privacy = map
            .get(PRIVACY_KEY)
            .and_then(Value::as_str)
            .and_then(|kind| kind.parse::<Privacy>().ok())
            .map(|privacy| match privacy {
                Privacy::Rule { .. } => Privacy::Rule {
                    no_share: map
                        .get(NO_SHARE_KEY)
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    expire_at: map
                        .get(EXPIRE_AT_KEY)
                        .and_then(Value::as_i64)
                        .unwrap_or(0),
                },
                other => other,
            });

        if tags.is_none() && auto_publish.is_none() && privacy.is_none() {
            return None;
        }
        Some(Self {
            tags: tags.unwrap_or_default(),
            auto_publish: auto_publish.unwrap_or(true),
            privacy,
        })
    }
}

/// Write the identifier and mirrored settings into the header.
///
/// Creates a header when the document has none. Fails when an existing
/// header cannot be parsed, since it cannot be patched without
/// losing its content. Unrelated entries are kept byte-for-byte.
pub fn write_identity(
    text: &str,
    key: &str,
    identifier: &str,
    settings: &MirroredSettings,
) -> FrontmatterResult<String> {
    let key = normalize_key(key);
    let mut owned = Mapping::new();
    owned.insert(Value::from(key), Value::from(identifier));
    settings.apply(&mut owned);
    let owned_yaml = to_yaml(&owned)?;

    let span = match locate_header(text)? {
        Some(span) => span,
        None => {
            return Ok(format!(
                "{HEADER_DELIMITER}\n{owned_yaml}{HEADER_DELIMITER}\n{text}"
            ))
        }
    };

    let yaml = &text[span.yaml.clone()];
    let mut expected = parse_mapping(yaml)?;
    expected.insert(Value::from(key), Value::from(identifier));
    settings.apply(&mut expected);

    let patched = patch_entries(yaml, key, &owned_yaml);
    let header = if parse_mapping(&patched).ok().as_ref() == Some(&expected) {
        patched
    } else {
        debug!("Header layout not patchable in place; serializing the whole mapping");
        to_yaml(&expected)?
    };

    Ok(format!(
        "{}{}{}",
        &text[..span.yaml.start],
        header,
        &text[span.yaml.end..]
    ))
}

fn to_yaml(map: &Mapping) -> FrontmatterResult<String> {
    serde_yaml::to_string(map).map_err(|e| FrontmatterError::Serialize(e.to_string()))
}

/// Top-level header entry: the key line plus its continuation lines.
/// Comment lines at column 0 form entries without a key.
struct Entry<'a> {
    key: Option<&'a str>,
    lines: Vec<&'a str>,
}

fn split_entries(yaml: &str) -> Vec<Entry<'_>> {
    let mut entries: Vec<Entry<'_>> = Vec::new();
    for line in yaml.split_inclusive('\n') {
        let starts_entry = !line.starts_with(char::is_whitespace);
        if starts_entry && line.starts_with('#') {
            entries.push(Entry {
                key: None,
                lines: vec![line],
            });
            continue;
        }
        let key = starts_entry
            .then(|| TOP_LEVEL_KEY.captures(line))
            .flatten()
            .and_then(|cap| cap.get(1).or(cap.get(2)).or(cap.get(3)))
            .map(|m| m.as_str().trim());

        if key.is_none() {
            if let Some(entry) = entries.last_mut() {
                entry.lines.push(line);
                continue;
            }
        }
        entries.push(Entry {
            key,
            lines: vec![line],
        });
    }
    entries
}

/// Replace the owned entries with `owned_yaml`, at the position of the
/// first owned entry or appended after the last entry
fn patch_entries(yaml: &str, identity_key: &str, owned_yaml: &str) -> String {
    let is_owned = |key: &str| key == identity_key || MIRRORED_KEYS.iter().any(|k| *k == key);

    let mut out = String::with_capacity(yaml.len() + owned_yaml.len());
    let mut placed = false;
    for entry in split_entries(yaml) {
        if entry.key.is_some_and(is_owned) {
            if !placed {
                out.push_str(owned_yaml);
                placed = true;
            }
            continue;
        }
        for line in entry.lines {
            out.push_str(line);
        }
    }

    if !placed {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(owned_yaml);
    }
    out
}

/// Read the mirrored settings of the last publish, if any were written
pub fn read_mirrored_settings(text: &str) -> Option<MirroredSettings> {
    match parse_header(text) {
        Ok(Some(map)) => MirroredSettings::from_mapping(&map),
        Ok(None) => None,
        Err(err) => {
            debug!("{err}; ignoring mirrored settings");
            None
        }
    }
}

fn tag_list(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    raw.iter()
        .map(|t| t.trim().trim_start_matches('#').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags declared in the header's `tags` key.
///
/// Accepts a YAML list or a comma-separated string. A malformed or missing
/// header yields no tags.
pub fn extract_tags(text: &str) -> Vec<String> {
    match parse_header(text) {
        Ok(Some(map)) => map.get("tags").map(tag_list).unwrap_or_default(),
        Ok(None) => Vec::new(),
        Err(err) => {
            debug!("{err}; no tags extracted");
            Vec::new()
        }
    }
}
