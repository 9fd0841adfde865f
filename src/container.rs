//! Folder identifier extraction.
//!
//! The folder to search can be handed over as a raw Drive ID or as a
//! pasted browser URL; either way the API wants the bare ID.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

static FOLDER_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)")
        .expect("Invalid folder URL regex")
});

static OPEN_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)")
        .expect("Invalid open URL regex")
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a folder ID from a Drive folder URL, or validate a raw ID.
///
/// Accepted forms:
/// - `https://drive.google.com/drive/folders/<ID>`
/// - `https://drive.google.com/drive/u/0/folders/<ID>`
/// - `https://drive.google.com/open?id=<ID>`
/// - Raw ID string
///
/// # Examples
///
/// ```
/// use drive_fetch::container::extract_folder_id;
///
/// let id = extract_folder_id("https://drive.google.com/drive/folders/1abc123").unwrap();
/// assert_eq!(id, "1abc123");
///
/// let id = extract_folder_id("1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// ```
pub fn extract_folder_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    for pattern in [&FOLDER_URL_REGEX, &OPEN_URL_REGEX] {
        if let Some(id) = pattern.captures(trimmed).and_then(|c| c.get(1)) {
            return Ok(id.as_str().to_string());
        }
    }

    if !trimmed.is_empty() && ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(DriveError::InvalidFolderId(url_or_id.to_string()))
}
