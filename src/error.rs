use thiserror::Error;

/// Unified error type for nsv operations
#[derive(Error, Debug)]
pub enum NsvError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error(
        "template field {{{{.{field}}}}} is not recognised and would resolve to an invalid semantic version"
    )]
    UnsupportedField { field: String },

    #[error("Template syntax error: {0}")]
    TemplateSyntax(String),

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("paths do not exist within the current repository: {}", .0.join(", "))]
    MissingPaths(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in nsv
pub type Result<T> = std::result::Result<T, NsvError>;

impl NsvError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        NsvError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        NsvError::Tag(msg.into())
    }

    /// Create a template syntax error with context
    pub fn template(msg: impl Into<String>) -> Self {
        NsvError::TemplateSyntax(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        NsvError::Hook(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NsvError::version("'1.2' is not a semantic version");
        assert_eq!(
            err.to_string(),
            "Version parsing error: '1.2' is not a semantic version"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NsvError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_unsupported_field_names_the_field() {
        let err = NsvError::UnsupportedField {
            field: "Unknown".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template field {{.Unknown}} is not recognised and would resolve to an invalid semantic version"
        );
    }

    #[test]
    fn test_missing_paths_lists_every_path() {
        let err = NsvError::MissingPaths(vec!["search".to_string(), "store".to_string()]);
        assert_eq!(
            err.to_string(),
            "paths do not exist within the current repository: search, store"
        );
    }

    #[test]
    fn test_error_constructors() {
        assert!(NsvError::tag("test").to_string().contains("Tag"));
        assert!(NsvError::template("unclosed action")
            .to_string()
            .contains("Template syntax"));
        assert!(NsvError::hook("exit 1").to_string().contains("Hook failed"));
    }

    #[test]
    fn test_error_debug_format() {
        let err = NsvError::tag("debug test");
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Tag"));
    }
}
