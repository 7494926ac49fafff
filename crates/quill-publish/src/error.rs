//! Publish error taxonomy

use quill_core::VaultError;
use quill_parser::FrontmatterError;
use thiserror::Error;

/// Errors raised while publishing.
///
/// Asset-level and reference errors are recovered by the upload pipeline;
/// the rest end the publish with a failed outcome.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Missing or invalid local configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure talking to the remote service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered but rejected the request
    #[error("{message}")]
    RemoteApi {
        /// Server-supplied or synthesized message
        message: String,
        /// Raw response body, when one was received
        payload: Option<serde_json::Value>,
    },

    /// Requesting upload credentials for an asset failed
    #[error("Upload authorization failed: {0}")]
    UploadAuthorization(String),

    /// Delivering an asset to the upload endpoint failed
    #[error("Upload delivery failed: {0}")]
    UploadDelivery(String),

    /// An embed target could not be found or read
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// An embedded note has no remote identity yet
    #[error("Embedded note has not been published: {0}")]
    UnpublishedNote(String),

    /// Vault access failed outside of asset resolution
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The note's frontmatter could not be patched
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

impl PublishError {
    /// Whether the failure only affects a single embed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PublishError::UploadAuthorization(_)
                | PublishError::UploadDelivery(_)
                | PublishError::UnresolvedReference(_)
                | PublishError::UnpublishedNote(_)
        )
    }

    /// Raw server payload attached to the error, if any
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            PublishError::RemoteApi { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn remote(message: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        PublishError::RemoteApi {
            message: message.into(),
            payload,
        }
    }
}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_variants() {
        assert!(PublishError::UploadAuthorization("x".into()).is_recoverable());
        assert!(PublishError::UploadDelivery("x".into()).is_recoverable());
        assert!(PublishError::UnresolvedReference("x".into()).is_recoverable());
        assert!(PublishError::UnpublishedNote("x".into()).is_recoverable());
        assert!(!PublishError::Configuration("x".into()).is_recoverable());
        assert!(!PublishError::remote("bad", None).is_recoverable());
    }

    #[test]
    fn test_remote_message_is_display() {
        let err = PublishError::remote("quota exceeded", Some(serde_json::json!({"code": 7})));
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.payload(), Some(&serde_json::json!({"code": 7})));
    }
}
