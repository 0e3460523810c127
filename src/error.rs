//! Error types shared by the library

use std::path::PathBuf;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while querying the content store or shaping its output
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required document does not exist (or is not visible in this mode)
    #[error("{doc_type} not found: {key}")]
    NotFound { doc_type: String, key: String },

    /// The query is malformed or references an unknown parameter
    #[error("invalid query: {0}")]
    Query(String),

    /// A raw predicate reached a source that cannot evaluate it
    #[error("filter cannot be evaluated locally: {0}")]
    UnsupportedFilter(String),

    /// Draft reads need a bearer credential
    #[error("draft mode requires a viewer token")]
    MissingToken,

    #[error("content store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The content store answered with a non-success status
    #[error("content store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode content: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error in {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for a missing document
    pub fn not_found(doc_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            doc_type: doc_type.into(),
            key: key.into(),
        }
    }

    /// Attach the offending path to an IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means "nothing to show" rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("page", "about");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "page not found: about");
    }

    #[test]
    fn test_missing_token_is_not_not_found() {
        assert!(!Error::MissingToken.is_not_found());
    }
}
