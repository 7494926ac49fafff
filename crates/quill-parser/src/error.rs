//! Parser error types

use thiserror::Error;

/// Frontmatter (metadata header) failures
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The header is not valid YAML
    #[error("Frontmatter parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The header parsed, but is not a key/value mapping
    #[error("Frontmatter is not a mapping")]
    NotAMapping,

    /// The patched header could not be serialized back to YAML
    #[error("Frontmatter serialization error: {0}")]
    Serialize(String),

    /// The document starts a header that is never closed
    #[error("Frontmatter is not terminated")]
    Unterminated,
}

/// Specialized Result type for frontmatter operations
pub type FrontmatterResult<T> = Result<T, FrontmatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FrontmatterError::NotAMapping.to_string(),
            "Frontmatter is not a mapping"
        );
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [b").unwrap_err();
        let err = FrontmatterError::from(yaml_err);
        assert!(err.to_string().starts_with("Frontmatter parse error"));
    }
}
