use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuillError {
    /// Error when a match/replace token cannot be used by the rewrite engine
    #[error("Invalid rewrite rule: {0}")]
    InvalidRule(String),

    /// Error when a configuration file cannot be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error when settings cannot be serialized back to TOML
    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// I/O errors from file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient Result type alias using `QuillError`.
pub type Result<T> = std::result::Result<T, QuillError>;

impl QuillError {
    /// Creates a new invalid-rule error with a descriptive message.
    pub fn invalid_rule(detail: impl Into<String>) -> Self {
        Self::InvalidRule(detail.into())
    }
}

/// Convert `QuillError` to a String for embedding hosts that only
/// forward error text.
impl From<QuillError> for String {
    fn from(error: QuillError) -> Self {
        error.to_string()
    }
}
