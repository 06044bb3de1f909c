use crate::config::CollectConfig;
use crate::data_processing::{
    PersistError, QueryResult, SearchBundle, TrendingBundle, VideoSource, into_raw_response,
    iso_stamp, results_path, trending_csv_path, write_to_csv, write_to_json,
};
use crate::summary::summarize_videos;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Files produced by one run.
#[derive(Debug)]
pub struct RunArtifacts {
    pub json_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

/// Searches each keyword in turn. A failed search is recorded as an
/// error object and the remaining keywords are still searched.
pub fn collect_search(
    keywords: &[String],
    max_results: u32,
    source: &impl VideoSource,
    fetched_at: &DateTime<Utc>,
) -> SearchBundle {
    let results = keywords
        .iter()
        .map(|term| {
            tracing::info!("Searching for keyword: {}", term);
            let outcome = source.search(term, max_results);
            if let Err(err) = &outcome {
                tracing::warn!("Failed to search for {:?}: {}", term, err);
            }
            QueryResult {
                query: term.clone(),
                result: into_raw_response(outcome),
            }
        })
        .collect();

    SearchBundle {
        fetched_at: iso_stamp(fetched_at),
        max_results,
        queries: keywords.to_vec(),
        results,
    }
}

/// Fetches the trending chart once, recording a failure as an error object.
pub fn collect_trending(
    region: &str,
    max_results: u32,
    source: &impl VideoSource,
    fetched_at: &DateTime<Utc>,
) -> TrendingBundle {
    tracing::info!("Fetching trending videos for region: {}", region);
    let outcome = source.trending(region, max_results);
    if let Err(err) = &outcome {
        tracing::warn!("Failed to query trending videos: {}", err);
    }

    TrendingBundle {
        fetched_at: iso_stamp(fetched_at),
        region: region.to_owned(),
        items: into_raw_response(outcome),
    }
}

/// Writes the CSV summary of a videos response, if it has any rows.
pub fn save_trending_csv(
    response: &Value,
    dir: impl AsRef<Path>,
    time: &DateTime<Utc>,
) -> Result<Option<PathBuf>, PersistError> {
    let rows = match summarize_videos(response) {
        Some(rows) => rows,
        None => {
            tracing::info!("No items present to write CSV output; skipping CSV.");
            return Ok(None);
        }
    };
    if rows.is_empty() {
        tracing::info!("No parsed rows for CSV; skipping CSV.");
        return Ok(None);
    }

    let csv_path = trending_csv_path(dir, time);
    write_to_csv(&rows, &csv_path)?;
    tracing::info!("Saved CSV summary to: {}", csv_path.display());
    Ok(Some(csv_path))
}

fn save_json(
    bundle: &impl serde::Serialize,
    dir: impl AsRef<Path>,
    time: &DateTime<Utc>,
) -> Result<PathBuf, PersistError> {
    let json_path = results_path(dir, time);
    write_to_json(bundle, &json_path)?;
    tracing::info!("Saved results to: {}", json_path.display());
    Ok(json_path)
}

/// Keyword-search run: query every keyword, then persist the bundle.
pub fn run_search(
    config: CollectConfig,
    source: &impl VideoSource,
) -> Result<RunArtifacts, PersistError> {
    let now = Utc::now();
    let bundle = collect_search(&config.keywords, config.max_results, source, &now);
    let json_path = save_json(&bundle, &config.output_dir, &now)?;
    Ok(RunArtifacts {
        json_path,
        csv_path: None,
    })
}

/// Writes the CSV summary when possible, then the bundle itself.
/// The JSON is written even if the CSV fails; the CSV error is returned after.
pub fn persist_trending(
    bundle: &TrendingBundle,
    dir: impl AsRef<Path>,
    time: &DateTime<Utc>,
) -> Result<RunArtifacts, PersistError> {
    let dir = dir.as_ref();
    let csv_result = save_trending_csv(&bundle.items, dir, time);
    if let Err(err) = &csv_result {
        tracing::error!("Failed to save CSV summary: {}", err);
    }
    let json_path = save_json(bundle, dir, time)?;
    Ok(RunArtifacts {
        json_path,
        csv_path: csv_result?,
    })
}

/// Trending run: fetch the chart, then persist it.
pub fn run_trending(
    config: CollectConfig,
    source: &impl VideoSource,
) -> Result<RunArtifacts, PersistError> {
    let now = Utc::now();
    let bundle = collect_trending(&config.region, config.max_results, source, &now);
    persist_trending(&bundle, &config.output_dir, &now)
}
