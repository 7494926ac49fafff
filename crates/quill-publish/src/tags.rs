//! Tag list normalization

/// Turn a comma-separated tag string into the list sent with a note.
///
/// Tags are trimmed, empties dropped and duplicates removed (first occurrence
/// wins). `default_tag` is appended unless it is blank or already present.
pub fn normalize_tags(csv: &str, default_tag: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in csv.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    let default_tag = default_tag.trim();
    if !default_tag.is_empty() && !tags.iter().any(|t| t == default_tag) {
        tags.push(default_tag.to_string());
    }
    tags
}
