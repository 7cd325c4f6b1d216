//! Error types for decoding, rendering and encoding signatures

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SignatureError>;

/// Errors that can occur anywhere in the signature pipeline
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature text was not a JSON array of segments
    #[error("invalid signature input: {reason}")]
    InvalidInput {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Canvas allocation or resampling failed
    #[error("render failed: {reason}")]
    Render { reason: String },

    /// PNG encoding failed, or nothing has been rendered yet
    #[error("encode failed: {reason}")]
    Encode {
        reason: String,
        #[source]
        source: Option<png::EncodingError>,
    },

    /// Writing the encoded image to its destination failed
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An option file could not be read or parsed
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading render options from TOML
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read options file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse options TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl SignatureError {
    /// Create an invalid input error without an underlying JSON error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a render error
    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render {
            reason: reason.into(),
        }
    }

    /// Create an encode error without an underlying encoder error
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an I/O error for a destination path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the signature data itself
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for SignatureError {
    fn from(err: serde_json::Error) -> Self {
        let reason = if err.is_data() {
            format!("expected an array of {{lx, ly, mx, my}} objects ({})", err)
        } else {
            format!("malformed JSON ({})", err)
        };
        Self::InvalidInput {
            reason,
            source: Some(err),
        }
    }
}

impl From<png::EncodingError> for SignatureError {
    fn from(err: png::EncodingError) -> Self {
        Self::Encode {
            reason: err.to_string(),
            source: Some(err),
        }
    }
}
