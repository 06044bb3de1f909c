mod yt_api;

pub use yt_api::{
    MAX_TRENDING_RESULTS, QueryError, QueryOutcome, REQUEST_TIMEOUT, VideoSource, YouTubeClient,
    into_raw_response, search_params, trending_params,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Everything gathered by one trending run.
#[derive(Serialize, Deserialize, Debug)]
pub struct TrendingBundle {
    /// When the run started, in ISO-8601 UTC.
    pub fetched_at: String,
    pub region: String,
    /// The videos endpoint's response, or an `{"error": ..}` object.
    pub items: Value,
}

/// One keyword and what the search endpoint said about it.
#[derive(Serialize, Deserialize, Debug)]
pub struct QueryResult {
    pub query: String,
    pub result: Value,
}

/// Everything gathered by one keyword-search run.
#[derive(Serialize, Deserialize, Debug)]
pub struct SearchBundle {
    pub fetched_at: String,
    pub max_results: u32,
    /// The keywords in the order they were searched.
    pub queries: Vec<String>,
    /// One entry per keyword, in the same order as `queries`.
    pub results: Vec<QueryResult>,
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("File writing error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialize row: {0}")]
    Csv(#[from] csv::Error),
}

/// Compact, lexically sortable stamp used in output file names.
pub fn file_stamp(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// ISO-8601 stamp with microseconds, as stored in `fetched_at`.
pub fn iso_stamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub fn results_path(dir: impl AsRef<Path>, time: &DateTime<Utc>) -> PathBuf {
    dir.as_ref()
        .join(format!("yt_results_{}.json", file_stamp(time)))
}

pub fn trending_csv_path(dir: impl AsRef<Path>, time: &DateTime<Utc>) -> PathBuf {
    dir.as_ref()
        .join(format!("yt_trending_{}.csv", file_stamp(time)))
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    std::fs::create_dir_all(dir).map_err(|source| PersistError::Io {
        path: dir.to_owned(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), PersistError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(()),
    }
}

/// Writes `value` as indented JSON, keeping non-ASCII text as-is.
pub fn write_to_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Writes one CSV row per value, with a header taken from `T`'s field names.
pub fn write_to_csv<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    values.iter().try_for_each(|val| writer.serialize(val))?;
    writer.flush().map_err(|source| PersistError::Io {
        path: path.to_owned(),
        source,
    })
}
