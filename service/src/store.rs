//! Flat-file store for recorded guesses.
//!
//! The whole aggregate lives in a single JSON document of the shape
//! `{ "users": { <login>: { "win": bool, "word": string, "at": timestamp } } }`,
//! loaded fully into memory, mutated, and rewritten on every change.
//! Every load-mutate-save sequence must hold [`ResultStore::lock`], and
//! `save` writes to a sibling temp file and renames it over the target so a
//! crash mid-write never leaves a torn document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use utoipa::ToSchema;

/// Store-level error with the original failure attached as `source`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: StoreErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum StoreErrorKind {
    /// File I/O failure other than "file absent on load".
    Io,
    /// The persisted document could not be parsed or serialized.
    Serialization,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Store Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: StoreErrorKind::Io,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: StoreErrorKind::Serialization,
        }
    }
}

/// One recorded guess. At most one per login, ever: the first submission is
/// final and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredResult {
    pub win: bool,
    /// The submitted text, trimmed. Private to the submitter: never exposed
    /// through the scoreboard projection.
    pub word: String,
    pub at: DateTime<Utc>,
}

/// The whole-file aggregate. `BTreeMap` keeps the scoreboard projection
/// ordered by login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsFile {
    #[serde(default)]
    pub users: BTreeMap<String, StoredResult>,
}

/// Outcome of a submission attempt. `already_submitted` distinguishes a fresh
/// record from an idempotent replay of an earlier one.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub already_submitted: bool,
    pub result: StoredResult,
}

/// Scoreboard projection of one entry: identity and win flag only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResultSummary {
    pub login: String,
    pub win: bool,
}

/// Durable mapping from login to recorded guess, owned exclusively by this
/// process.
pub struct ResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialization point for read-modify-write cycles. Hold the returned
    /// guard across the whole load-mutate-save sequence; concurrent first
    /// submissions would otherwise race the cycle and the last writer would
    /// win on the whole file.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Reads and parses the persisted aggregate. An absent file is the
    /// first-run bootstrap case and yields an empty aggregate, not an error.
    pub async fn load(&self) -> Result<ResultsFile, Error> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ResultsFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Serializes and rewrites the persisted aggregate in full, via a
    /// temp-file rename so readers never observe a partial document.
    pub async fn save(&self, file: &ResultsFile) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
