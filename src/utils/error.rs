//! Error handling for token conversions
//!
//! This module provides a unified error type and result type for all
//! conversion operations, plus the non-fatal warning type collected
//! alongside evaluation output.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum TokenError {
    /// A token-set file could not be parsed as JSON
    JsonError { file: String, message: String },
    /// The `$metadata.json` manifest is required but absent
    MissingManifest { path: String },
    /// Invalid theme configuration
    InvalidConfig { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::JsonError { file, message } => {
                write!(f, "JSON error in {}: {}", file, message)
            }
            TokenError::MissingManifest { path } => {
                write!(f, "Manifest not found: {}", path)
            }
            TokenError::InvalidConfig { message } => {
                write!(f, "Invalid theme config: {}", message)
            }
            TokenError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for TokenError {}

impl From<std::io::Error> for TokenError {
    fn from(err: std::io::Error) -> Self {
        TokenError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type TokenResult<T> = Result<T, TokenError>;

// Convenience constructors for errors
impl TokenError {
    pub fn json(file: impl Into<String>, message: impl Into<String>) -> Self {
        TokenError::JsonError {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn missing_manifest(path: impl Into<String>) -> Self {
        TokenError::MissingManifest { path: path.into() }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        TokenError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        TokenError::IoError {
            message: message.into(),
        }
    }
}

/// Conversion warnings (non-fatal issues)
///
/// Missing token-set files, circular references and skipped themes surface
/// here rather than aborting the run.
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    pub message: String,
    /// Context identifier, e.g. a token path or theme name
    pub context: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref ctx) = self.context {
            write!(f, "[{}] {}", ctx, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}
