use thiserror::Error;

/// Bad input shape. Surfaced to the caller as-is and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid privacy level: '{0}'")]
    InvalidPrivacy(String),

    #[error("Invalid viewer role: '{0}'")]
    InvalidRole(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Unsupported file type, upload a JPEG, PNG, GIF or WebP image")]
    UnsupportedFileType,

    #[error("File is too large ({size} bytes, the limit is {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("{0}")]
    Other(String),
}
