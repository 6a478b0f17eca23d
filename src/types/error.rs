use thiserror::Error;

/// ghstamp error types
#[derive(Error, Debug)]
pub enum GhstampError {
    /// Plain-text grid did not have the expected shape
    #[error("format error: {0}")]
    Format(String),

    /// Text could not be rendered into a pattern
    #[error("render error: {0}")]
    Render(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for ghstamp
pub type Result<T> = std::result::Result<T, GhstampError>;
