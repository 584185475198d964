//! Error types for rcini

use crate::codec::CodecError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rcini operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rcini
///
/// Variants raised by a store operation carry the operation name in `op`,
/// which is printed as a prefix (e.g. `write: missing key`).
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("{op}: invalid parameter: {reason}")]
    InvalidParameter { op: &'static str, reason: String },

    #[error("{op}: missing configuration path")]
    MissingPath { op: &'static str },

    #[error("{op}: missing {field}")]
    MissingArgument {
        op: &'static str,
        field: &'static str,
    },

    // -------------------------------------------------------------------------
    // Filesystem Errors
    // -------------------------------------------------------------------------
    #[error("{op}: file not found '{path}'")]
    FileNotFound { op: &'static str, path: PathBuf },

    #[error("{op}: target is directory '{path}'")]
    TargetIsDirectory { op: &'static str, path: PathBuf },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("{op}: cannot read configuration '{path}': {source}")]
    Parse {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("{op}: cannot save configuration '{path}': {source}")]
    Save {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("{op}: cannot find section '{section}'")]
    SectionNotFound { op: &'static str, section: String },

    #[error("{op}: cannot find value '{key}' in section '{section}'")]
    ValueNotFound {
        op: &'static str,
        section: String,
        key: String,
    },

    // -------------------------------------------------------------------------
    // Export Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize sections: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound { .. } | Error::SectionNotFound { .. } | Error::ValueNotFound { .. }
        )
    }

    /// Check if the caller passed an unusable argument or used an uninitialized store
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. } | Error::MissingPath { .. } | Error::MissingArgument { .. }
        )
    }

    /// Name of the store operation that produced this error, if any
    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Error::InvalidParameter { op, .. }
            | Error::MissingPath { op }
            | Error::MissingArgument { op, .. }
            | Error::FileNotFound { op, .. }
            | Error::TargetIsDirectory { op, .. }
            | Error::Parse { op, .. }
            | Error::Save { op, .. }
            | Error::SectionNotFound { op, .. }
            | Error::ValueNotFound { op, .. } => Some(op),
            Error::DirectoryCreate { .. } | Error::FileCreate { .. } | Error::Json(_) => None,
        }
    }
}
