//! Search-with-retry logic for locating a file inside a Drive folder.
//!
//! Drive is eventually consistent: a freshly uploaded file can be fully
//! readable yet invisible to search for a while. The locator runs a
//! bounded loop of exact-name searches with a fixed delay between
//! attempts, short-circuiting on the first unique match. The delay is
//! linear rather than exponential: the indexing window is narrow and
//! roughly constant, so there is nothing to gain from growing it.

use std::time::Duration;

use crate::error::{DriveError, Result};
use crate::models::FileMetadata;

/// Search capability the locator consumes.
///
/// `DriveClient` implements this against the real API; tests drive the
/// locator with a scripted fake instead.
#[allow(async_fn_in_trait)]
pub trait SearchDrive {
    /// Find non-folder items named exactly `filename` inside `folder_id`.
    async fn search_file(&self, folder_id: &str, filename: &str) -> Result<Vec<FileMetadata>>;

    /// List everything at the folder's top level (verbose diagnostics).
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileMetadata>>;
}

/// What to look for, and where.
#[derive(Debug, Clone)]
pub struct FileQuery {
    /// Folder or shared-drive-subtree ID scoping the search.
    pub folder_id: String,
    /// Exact, case-sensitive file name.
    pub filename: String,
}

/// Bounds for the retry loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of search attempts; at least 1.
    pub max_attempts: u32,
    /// Fixed pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Worst-case total sleep time: the loop sleeps between attempts,
    /// never after the last one.
    pub fn max_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Result of a single search attempt.
enum AttemptOutcome {
    Found(FileMetadata),
    Missing,
    Failed(DriveError),
}

/// Locates a single file by exact name, retrying across the indexing
/// window.
pub struct Locator {
    query: FileQuery,
    policy: RetryPolicy,
    verbose: bool,
}

impl Locator {
    pub fn new(query: FileQuery, policy: RetryPolicy) -> Self {
        Self {
            query,
            policy,
            verbose: false,
        }
    }

    /// When set, every missed attempt also lists the folder's visible
    /// contents to stderr so a human can spot naming or permission
    /// mismatches.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the retry loop until a unique match is found or attempts are
    /// exhausted.
    ///
    /// A search error is retried like a miss on every attempt before the
    /// last and surfaced as-is on the last; it is never downgraded to
    /// `NotFound`. More than one match is resolved by strictly
    /// most-recently-modified, or fails immediately with
    /// `AmbiguousMatch` (retrying cannot fix a true duplicate).
    pub async fn locate<S: SearchDrive>(&self, drive: &S) -> Result<FileMetadata> {
        let mut last_failure: Option<DriveError> = None;

        for attempt in 1..=self.policy.max_attempts {
            eprintln!(
                "Attempt {}/{}: searching for '{}' in folder {}",
                attempt, self.policy.max_attempts, self.query.filename, self.query.folder_id
            );

            let outcome = match drive
                .search_file(&self.query.folder_id, &self.query.filename)
                .await
            {
                Ok(matches) => match select_match(matches, &self.query)? {
                    Some(file) => AttemptOutcome::Found(file),
                    None => AttemptOutcome::Missing,
                },
                Err(e) => AttemptOutcome::Failed(e),
            };

            match outcome {
                AttemptOutcome::Found(file) => {
                    eprintln!("Found '{}' (ID: {})", file.name, file.id);
                    return Ok(file);
                }
                AttemptOutcome::Missing => {
                    eprintln!("File not visible yet");
                    last_failure = None;
                    if self.verbose {
                        self.report_folder(drive).await;
                    }
                }
                AttemptOutcome::Failed(e) => {
                    eprintln!("Search failed: {}", e);
                    last_failure = Some(e);
                }
            }

            if attempt < self.policy.max_attempts {
                eprintln!("Waiting {:?} before retry...", self.policy.delay);
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        // The last attempt's outcome decides how exhaustion is reported:
        // a clean miss is NotFound, a failed search surfaces its error.
        match last_failure {
            Some(e) => Err(e),
            None => Err(DriveError::NotFound {
                folder_id: self.query.folder_id.clone(),
                filename: self.query.filename.clone(),
                attempts: self.policy.max_attempts,
            }),
        }
    }

    /// Dump the folder's visible contents to stderr. Diagnostics only; a
    /// listing failure never fails the locate.
    async fn report_folder<S: SearchDrive>(&self, drive: &S) {
        match drive.list_folder(&self.query.folder_id).await {
            Ok(files) if files.is_empty() => {
                eprintln!("No items visible in folder {}", self.query.folder_id);
            }
            Ok(files) => {
                eprintln!(
                    "{} item(s) visible in folder {}:",
                    files.len(),
                    self.query.folder_id
                );
                for file in &files {
                    eprintln!("  {}", file);
                }
            }
            Err(e) => {
                eprintln!("Could not list folder {}: {}", self.query.folder_id, e);
            }
        }
    }
}

/// Reduce one search's matches to at most one winner.
///
/// Duplicate names resolve to the strictly most recently modified file.
/// Missing or tied modification times fail loudly: API result ordering
/// is not stable, so picking "the first" would be a coin toss.
fn select_match(mut matches: Vec<FileMetadata>, query: &FileQuery) -> Result<Option<FileMetadata>> {
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches.swap_remove(0))),
        _ => {
            matches.sort_by(|a, b| b.modified_time.cmp(&a.modified_time));
            let strict_winner = matches!(
                (&matches[0].modified_time, &matches[1].modified_time),
                (Some(a), Some(b)) if a > b
            );
            if strict_winner {
                Ok(Some(matches.swap_remove(0)))
            } else {
                Err(DriveError::AmbiguousMatch {
                    folder_id: query.folder_id.clone(),
                    filename: query.filename.clone(),
                    candidates: matches.iter().map(|f| f.id.clone()).collect(),
                })
            }
        }
    }
}
