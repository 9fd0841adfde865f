//! Google Drive API client used by the locator and fetcher.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::fetcher::FetchDrive;
use crate::locator::SearchDrive;
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Metadata fields requested on every list call. modifiedTime is required
/// for the duplicate-name tie-break.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, size, mimeType, modifiedTime)";

/// MIME type Drive assigns to folders; searches must exclude it.
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Client for locating and downloading files in a Drive folder or
/// shared-drive subtree.
///
/// Every request carries `supportsAllDrives=true` and
/// `includeItemsFromAllDrives=true`. A plain folder search silently
/// returns zero results against a shared drive without them, and they are
/// harmless for personally-owned folders, so there is a single code path.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
}

impl DriveClient {
    /// Create a client against the production Drive API.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_base_url(auth, DRIVE_API_BASE)
    }

    /// Create a client against an alternate endpoint (tests point this at
    /// a local mock server).
    pub fn with_base_url(auth: Authenticator, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Query files using Google Drive query syntax, following pagination.
    async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        let token = self.auth.get_access_token().await?;
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(&token)
                .query(&[
                    ("q", query),
                    ("includeItemsFromAllDrives", "true"),
                    ("supportsAllDrives", "true"),
                    ("fields", LIST_FIELDS),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(decode_api_error(status.as_u16(), error_body));
            }

            let list_response: FileListResponse = response.json().await?;
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }
}

impl SearchDrive for DriveClient {
    /// Search a folder for non-folder items whose name equals `filename`
    /// exactly. Duplicate names yield multiple entries; the locator
    /// decides what to do with them.
    async fn search_file(&self, folder_id: &str, filename: &str) -> Result<Vec<FileMetadata>> {
        let query = format!(
            "name = '{}' and '{}' in parents and mimeType != '{}' and trashed = false",
            filename.replace('\'', "\\'"),
            folder_id,
            FOLDER_MIME_TYPE
        );
        self.query_files(&query).await
    }

    /// List everything at the folder's top level, for verbose diagnostics.
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileMetadata>> {
        let query = format!("'{}' in parents and trashed = false", folder_id);
        self.query_files(&query).await
    }
}

impl FetchDrive for DriveClient {
    /// Stream a file's content to `dest`, returning the bytes written.
    ///
    /// The handle is flushed before returning; callers own partial-file
    /// cleanup on the error path.
    async fn download_to(&self, file_id: &str, dest: &Path) -> Result<u64> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DriveError::TransferError {
                file_id: file_id.to_string(),
                reason: format!("status {}: {}", status, error_body),
            });
        }

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;

        Ok(written)
    }
}

/// Decode the Drive API error envelope, falling back to the raw body.
fn decode_api_error(status: u16, body: String) -> DriveError {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }
    DriveError::ApiError {
        status,
        message: body,
    }
}
