//! Error types for chatdoc library.

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Result type alias for chatdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an export.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transcript input could not be decoded.
    #[error("Invalid transcript: {0}")]
    InvalidInput(String),

    /// Layout or export options leave no usable page area.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The page surface failed to encode the final artifact.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Error while painting the document onto a surface.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

/// Problems recovered during an export.
///
/// A warning never aborts the export; the affected item degrades to a
/// simpler rendering and the warning is reported alongside the artifact.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// Media bytes could not be fetched or decoded; a placeholder was used.
    #[error("media {url} unavailable: {reason}")]
    MediaFetchFailed {
        /// Source URL of the attachment
        url: String,
        /// Why the media was rejected
        reason: String,
    },

    /// A reply pointed at a message id that is not in the transcript.
    #[error("message {message_id} replies to unknown message {reply_to_id}")]
    DanglingReply {
        /// The replying message
        message_id: String,
        /// The id that could not be resolved
        reply_to_id: String,
    },

    /// A block taller than the usable page area was placed and overflows.
    #[error("block of height {height:.1} overflows page {page} (usable {usable:.1})")]
    OversizedBlock {
        /// 1-indexed page the block was placed on
        page: u32,
        /// Height of the block group
        height: f32,
        /// Usable height of that page
        usable: f32,
    },
}

impl Warning {
    /// Log this warning through the `log` facade.
    pub(crate) fn log(&self) {
        log::warn!("{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Serialization("disk full".to_string());
        assert_eq!(err.to_string(), "Serialization failed: disk full");

        let err = Error::InvalidOptions("margins exceed page height".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid options: margins exceed page height"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::DanglingReply {
            message_id: "m2".to_string(),
            reply_to_id: "m9".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "message m2 replies to unknown message m9"
        );

        let warning = Warning::OversizedBlock {
            page: 3,
            height: 412.0,
            usable: 257.0,
        };
        assert!(warning.to_string().contains("page 3"));
    }
}
