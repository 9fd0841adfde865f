//! Download side: resolve the destination, stream the file, report what
//! was written.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::FileMetadata;

/// Download capability the fetcher consumes.
///
/// `DriveClient` implements this by streaming `alt=media`; tests use a
/// fake writing scripted bytes.
#[allow(async_fn_in_trait)]
pub trait FetchDrive {
    /// Write the file's content to `dest`, returning the bytes written.
    async fn download_to(&self, file_id: &str, dest: &Path) -> Result<u64>;
}

/// The sole externally visible output of a successful run.
#[derive(Debug)]
pub struct DownloadResult {
    /// Path actually written.
    pub path: PathBuf,
    /// Bytes transferred.
    pub bytes: u64,
}

/// Map the user-supplied destination to the path that will be written.
///
/// No destination means the plain filename in the current working
/// directory; an existing directory (or a path spelled with a trailing
/// slash) gets the filename joined onto it; anything else is taken
/// verbatim.
pub fn resolve_destination(file: &FileMetadata, destination: Option<&Path>) -> PathBuf {
    match destination {
        None => PathBuf::from(&file.name),
        Some(dir) if dir.is_dir() || dir.to_string_lossy().ends_with('/') => dir.join(&file.name),
        Some(path) => path.to_path_buf(),
    }
}

/// Stream a located file to `destination`, creating missing parent
/// directories first.
///
/// On a failed transfer the partial file is removed so a truncated
/// download is never mistaken for a complete one.
pub async fn fetch<D: FetchDrive>(
    drive: &D,
    file: &FileMetadata,
    destination: Option<&Path>,
) -> Result<DownloadResult> {
    let dest = resolve_destination(file, destination);

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    eprintln!("Downloading '{}' to {}...", file.name, dest.display());

    match drive.download_to(&file.id, &dest).await {
        Ok(bytes) => Ok(DownloadResult { path: dest, bytes }),
        Err(e) => {
            let _ = std::fs::remove_file(&dest);
            Err(e)
        }
    }
}
