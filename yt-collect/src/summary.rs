use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const MAX_TITLE_CHARS: usize = 500;
pub const MAX_CHANNEL_CHARS: usize = 200;

/// A video's `id` field: the videos endpoint returns a bare string,
/// search results return an object.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum VideoId {
    Direct(String),
    Nested {
        #[serde(rename = "videoId", default)]
        video_id: Option<String>,
        #[serde(default)]
        kind: Option<String>,
    },
}

impl VideoId {
    /// The identifier to report, falling back to `kind` for nested ids
    /// that carry no `videoId`.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Direct(id) => Some(id.as_str()),
            Self::Nested { video_id, kind } => video_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .or(kind.as_deref()),
        }
    }
}

/// `viewCount` is a decimal string in the real API; anything else is kept
/// verbatim as its JSON text.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum ViewCount {
    Text(String),
    Other(Value),
}

impl fmt::Display for ViewCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Other(Value::Null) => Ok(()),
            Self::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Decodes a field, treating a value of the wrong type as absent so that
/// one odd field costs a cell rather than the whole row.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Option::<T>::deserialize(value).ok().flatten())
}

#[derive(Deserialize, Debug, Default)]
struct Snippet {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(rename = "channelTitle", default, deserialize_with = "lenient")]
    channel_title: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct Statistics {
    #[serde(rename = "viewCount", default, deserialize_with = "lenient")]
    view_count: Option<ViewCount>,
}

#[derive(Deserialize, Debug)]
struct VideoItem {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<VideoId>,
    #[serde(default, deserialize_with = "lenient")]
    snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "lenient")]
    statistics: Option<Statistics>,
}

/// One row of the trending CSV.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct VideoSummary {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    #[serde(rename = "viewCount")]
    pub view_count: String,
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl VideoItem {
    fn into_summary(self) -> VideoSummary {
        let snippet = self.snippet.unwrap_or_default();
        let statistics = self.statistics.unwrap_or_default();
        VideoSummary {
            video_id: self
                .id
                .as_ref()
                .and_then(VideoId::resolve)
                .unwrap_or_default()
                .to_owned(),
            title: truncate_chars(snippet.title.as_deref().unwrap_or(""), MAX_TITLE_CHARS),
            channel_title: truncate_chars(
                snippet.channel_title.as_deref().unwrap_or(""),
                MAX_CHANNEL_CHARS,
            ),
            view_count: statistics
                .view_count
                .map(|count| count.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Flattens a videos response into CSV rows.
///
/// Returns `None` when `response` has no `items` list, e.g. when it is an
/// `{"error": ..}` object. Items that aren't objects are skipped; fields of
/// the wrong type become empty cells.
pub fn summarize_videos(response: &Value) -> Option<Vec<VideoSummary>> {
    let items = response.get("items")?.as_array()?;
    let rows = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match VideoItem::deserialize(item) {
            Ok(video) => Some(video.into_summary()),
            Err(err) => {
                tracing::warn!("Skipping item {} with unexpected shape: {}", i, err);
                None
            }
        })
        .collect();
    Some(rows)
}
