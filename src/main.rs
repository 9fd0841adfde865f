//! drive_fetch CLI - Download one named file from a Drive folder,
//! riding out the search-indexing delay.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use drive_fetch::{
    extract_folder_id, fetch, Authenticator, DriveClient, FileQuery, Locator, RetryPolicy,
};

/// Download a file from Google Drive using service account credentials.
///
/// Searches the given folder for an exact filename, retrying while
/// Drive's search index catches up with a fresh upload, then streams the
/// file to the output path. Prints the written path on stdout; all
/// progress goes to stderr.
#[derive(Parser)]
#[command(name = "drive_fetch")]
#[command(author, version, about)]
struct Cli {
    /// Name of the file to download (exact, case-sensitive match).
    #[arg(long)]
    filename: String,

    /// Base64-encoded service account credentials JSON.
    #[arg(long, env = "DRIVE_CREDENTIALS", hide_env_values = true)]
    credentials_base64: String,

    /// Folder URL or ID to search in.
    #[arg(long, env = "DRIVE_FOLDER_ID")]
    folder_id: String,

    /// Output path for the downloaded file (default: the filename in the
    /// current directory; a trailing slash means "into this directory").
    #[arg(long)]
    output_path: Option<PathBuf>,

    /// Maximum number of search attempts.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: u32,

    /// Delay in seconds between attempts.
    #[arg(long, default_value_t = 5)]
    retry_delay: u64,

    /// List the folder's visible contents on every missed attempt.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let auth = Authenticator::from_base64(&cli.credentials_base64)
        .context("Failed to decode service account credentials")?;

    let folder_id = extract_folder_id(&cli.folder_id)
        .with_context(|| format!("Invalid folder URL or ID: {}", cli.folder_id))?;

    let client = DriveClient::new(auth);

    let query = FileQuery {
        folder_id: folder_id.clone(),
        filename: cli.filename.clone(),
    };
    let policy = RetryPolicy {
        max_attempts: cli.max_attempts,
        delay: Duration::from_secs(cli.retry_delay),
    };

    eprintln!(
        "Looking for '{}' in folder {} (up to {} attempt(s), worst-case wait {:?})",
        cli.filename,
        folder_id,
        policy.max_attempts,
        policy.max_wait()
    );

    let file = Locator::new(query, policy)
        .verbose(cli.verbose)
        .locate(&client)
        .await
        .with_context(|| format!("Could not locate '{}' in folder {}", cli.filename, folder_id))?;

    let result = fetch(&client, &file, cli.output_path.as_deref())
        .await
        .with_context(|| format!("Failed to download '{}' ({})", file.name, file.id))?;

    eprintln!(
        "Downloaded {} byte(s) to {}",
        result.bytes,
        result.path.display()
    );
    println!("{}", result.path.display());

    Ok(())
}
