//! Error types for the drive_fetch crate.

use thiserror::Error;

/// Errors that can occur while locating or fetching a file.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Failed to decode base64 credentials: {0}")]
    CredentialsDecodeError(#[from] base64::DecodeError),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("Invalid folder URL or ID: {0}")]
    InvalidFolderId(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("File '{filename}' not found in folder {folder_id} after {attempts} attempt(s)")]
    NotFound {
        folder_id: String,
        filename: String,
        attempts: u32,
    },

    #[error("Multiple files named '{filename}' in folder {folder_id}; candidate IDs: {candidates:?}")]
    AmbiguousMatch {
        folder_id: String,
        filename: String,
        candidates: Vec<String>,
    },

    #[error("Transfer of file {file_id} failed: {reason}")]
    TransferError { file_id: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
