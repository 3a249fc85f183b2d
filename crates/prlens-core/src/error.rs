use std::path::PathBuf;

/// Errors that can occur across prlens.
///
/// Analysis itself never fails: malformed diff fragments are skipped and
/// empty inputs yield default results. Errors come from reading input and
/// from configuration that would otherwise make a detector silently inert.
/// The binary crate converts to a `miette` report at the boundary.
///
/// # Examples
///
/// ```
/// use prlens_core::PrlensError;
///
/// let err = PrlensError::Config("sensitivity must be within 0.0..=1.0".into());
/// assert!(err.to_string().contains("sensitivity"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PrlensError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(prlens::io))]
    Io(#[from] std::io::Error),

    /// Invalid or out-of-range configuration value.
    #[error("configuration error: {0}")]
    #[diagnostic(code(prlens::config), help("check the values in your .prlens.toml"))]
    Config(String),

    /// A custom glob or regex pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    #[diagnostic(
        code(prlens::invalid_pattern),
        help("custom patterns are compiled before analysis; fix or remove the pattern")
    )]
    InvalidPattern {
        /// The pattern as written in the configuration.
        pattern: String,
        /// Compiler error message.
        reason: String,
    },

    /// Input that could not be parsed at all.
    #[error("parse error: {0}")]
    #[diagnostic(code(prlens::parse))]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(prlens::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(prlens::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(prlens::file_not_found))]
    FileNotFound(PathBuf),
}

impl PrlensError {
    /// Build an [`PrlensError::InvalidPattern`] from any displayable compiler error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PrlensError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}
