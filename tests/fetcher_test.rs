//! Fetcher tests with fake download backends and temporary directories.

use std::path::Path;

use drive_fetch::{fetch, DriveError, FetchDrive, FileMetadata};

/// Writes a fixed payload, like a transfer that completes.
struct BytesDrive {
    payload: Vec<u8>,
}

impl FetchDrive for BytesDrive {
    async fn download_to(&self, _file_id: &str, dest: &Path) -> drive_fetch::Result<u64> {
        std::fs::write(dest, &self.payload)?;
        Ok(self.payload.len() as u64)
    }
}

/// Writes part of the payload, then reports a mid-stream failure.
struct TruncatingDrive {
    partial: Vec<u8>,
}

impl FetchDrive for TruncatingDrive {
    async fn download_to(&self, file_id: &str, dest: &Path) -> drive_fetch::Result<u64> {
        std::fs::write(dest, &self.partial)?;
        Err(DriveError::TransferError {
            file_id: file_id.to_string(),
            reason: "connection reset mid-stream".to_string(),
        })
    }
}

fn located_file(name: &str) -> FileMetadata {
    FileMetadata {
        id: "f1".to_string(),
        name: name.to_string(),
        mime_type: Some("application/zip".to_string()),
        size: Some(14),
        modified_time: None,
    }
}

#[tokio::test]
async fn creates_missing_parent_directories() {
    let drive = BytesDrive {
        payload: b"artifact-bytes".to_vec(),
    };
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("build/nested/output.zip");

    let result = fetch(&drive, &located_file("output.zip"), Some(dest.as_path()))
        .await
        .unwrap();

    assert_eq!(result.path, dest);
    assert_eq!(result.bytes, 14);
    assert_eq!(std::fs::read(&dest).unwrap(), b"artifact-bytes");
}

#[tokio::test]
async fn directory_destination_gets_the_filename_joined() {
    let drive = BytesDrive {
        payload: b"artifact-bytes".to_vec(),
    };
    let dir = tempfile::tempdir().unwrap();

    let result = fetch(&drive, &located_file("output.zip"), Some(dir.path()))
        .await
        .unwrap();

    assert_eq!(result.path, dir.path().join("output.zip"));
    assert!(result.path.exists());
}

#[tokio::test]
async fn fetching_twice_is_idempotent() {
    let drive = BytesDrive {
        payload: b"artifact-bytes".to_vec(),
    };
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("output.zip");
    let file = located_file("output.zip");

    let first = fetch(&drive, &file, Some(dest.as_path())).await.unwrap();
    let first_bytes = std::fs::read(&dest).unwrap();

    let second = fetch(&drive, &file, Some(dest.as_path())).await.unwrap();
    let second_bytes = std::fs::read(&dest).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn partial_file_is_removed_on_transfer_failure() {
    let drive = TruncatingDrive {
        partial: b"artifact".to_vec(),
    };
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("output.zip");

    let err = fetch(&drive, &located_file("output.zip"), Some(dest.as_path()))
        .await
        .unwrap_err();

    assert!(matches!(err, DriveError::TransferError { .. }));
    assert!(!dest.exists(), "truncated file must not be left behind");
}

#[tokio::test]
async fn reported_byte_count_matches_the_payload() {
    let payload = vec![7u8; 4096];
    let drive = BytesDrive {
        payload: payload.clone(),
    };
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("blob.bin");

    let result = fetch(&drive, &located_file("blob.bin"), Some(dest.as_path()))
        .await
        .unwrap();

    assert_eq!(result.bytes, 4096);
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), 4096);
}
