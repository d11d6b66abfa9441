//! Error types for the content pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Why a front-matter field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("missing or not a non-empty string")]
    MissingOrWrongTypeField,

    #[error("expected YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("not a valid calendar date")]
    InvalidDateValue,

    #[error("expected a non-empty list of tags")]
    EmptyTagList,

    #[error("every tag must be a non-empty string")]
    InvalidTagValue,
}

/// A post whose front matter does not describe a valid record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid \"{field}\" in {file}: {kind}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: &'static str,
    pub file: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, field: &'static str, file: &str) -> Self {
        Self {
            kind,
            field,
            file: file.to_string(),
        }
    }
}

/// Errors raised while loading posts
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front matter in {file}: {source}")]
    FrontMatter {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("markdown rendering failed: {0}")]
    Render(#[from] tokio::task::JoinError),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The validation failure behind this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field_and_file() {
        let err = ValidationError::new(ValidationErrorKind::InvalidDateFormat, "date", "hello.md");
        let msg = err.to_string();
        assert!(msg.contains("\"date\""));
        assert!(msg.contains("hello.md"));
        assert!(msg.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_content_error_exposes_validation() {
        let err: ContentError =
            ValidationError::new(ValidationErrorKind::EmptyTagList, "tags", "a.md").into();
        assert_eq!(
            err.as_validation().map(|e| e.kind),
            Some(ValidationErrorKind::EmptyTagList)
        );
        assert_eq!(err.to_string(), "invalid \"tags\" in a.md: expected a non-empty list of tags");
    }
}
