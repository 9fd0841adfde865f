//! drive_fetch - Resilient single-file retrieval from Google Drive.
//!
//! Built for automated pipelines that need a named artifact out of a
//! Drive folder or shared drive right after something else uploaded it.
//! Drive's search index lags uploads, so the locator retries an
//! exact-name search across the indexing window before the fetcher
//! streams the file to disk.
//!
//! # Example
//!
//! ```no_run
//! use drive_fetch::{fetch, Authenticator, DriveClient, FileQuery, Locator, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_base64("base64-encoded-service-account-json")?;
//!     let client = DriveClient::new(auth);
//!
//!     let query = FileQuery {
//!         folder_id: "folder-id".to_string(),
//!         filename: "Build-v1.0.0.zip".to_string(),
//!     };
//!     let file = Locator::new(query, RetryPolicy::default())
//!         .locate(&client)
//!         .await?;
//!
//!     let result = fetch(&client, &file, None).await?;
//!     println!("{}", result.path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod container;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod models;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::DriveClient;
pub use container::extract_folder_id;
pub use error::{DriveError, Result};
pub use fetcher::{fetch, DownloadResult, FetchDrive};
pub use locator::{FileQuery, Locator, RetryPolicy, SearchDrive};
pub use models::FileMetadata;
