//! Error types for GRF archive operations

use thiserror::Error;

/// GRF operation result type
pub type GrfResult<T> = Result<T, GrfError>;

/// Errors raised while opening an archive or reading its entries
#[derive(Debug, Error)]
pub enum GrfError {
    /// Header signature, version, entry count or directory offset is invalid
    #[error("Invalid GRF header: {reason}")]
    HeaderInvalid {
        /// Detailed description of the problem
        reason: String,
    },

    /// Directory blob failed to inflate or contains malformed entry records
    #[error("Corrupt GRF directory: {reason}")]
    DirectoryCorrupt {
        /// Detailed description of the problem
        reason: String,
    },

    /// Requested path is not present in the archive
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Requested path is a directory placeholder
    #[error("Not a regular file: {0}")]
    NotAFile(String),

    /// Entry data could not be decoded
    #[error("Failed to decode {path}: {reason}")]
    DecodeFailure {
        /// Path of the entry being decoded
        path: String,
        /// Detailed description of the problem
        reason: String,
    },

    /// I/O error from the underlying byte source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GrfError {
    pub(crate) fn header(reason: impl Into<String>) -> Self {
        Self::HeaderInvalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn directory(reason: impl Into<String>) -> Self {
        Self::DirectoryCorrupt {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error only concerns the requested path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::NotAFile(_))
    }

    /// Check if the error leaves the archive unusable
    ///
    /// Header and directory errors can only occur while opening, so no handle
    /// exists afterwards. Entry-level errors never affect other entries.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HeaderInvalid { .. } | Self::DirectoryCorrupt { .. })
    }
}
