use crate::config::{CollectConfig, Endpoints};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;

/// Upper bound on how long any single API call may block.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// The largest page the videos endpoint will return.
pub const MAX_TRENDING_RESULTS: u32 = 50;

const BODY_EXCERPT_CHARS: usize = 300;

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP Error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either the decoded response body or the reason there isn't one.
pub type QueryOutcome = Result<Value, QueryError>;

/// Converts a query outcome into the value stored in a result bundle.
/// Failures become `{"error": "<message>"}` so a run can carry on.
pub fn into_raw_response(outcome: QueryOutcome) -> Value {
    match outcome {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }),
    }
}

/// Anything that can answer the two queries the collectors issue.
pub trait VideoSource {
    /// Keyword search against the search endpoint.
    fn search(&self, term: &str, max_results: u32) -> QueryOutcome;
    /// The `mostPopular` chart for a region.
    fn trending(&self, region: &str, max_results: u32) -> QueryOutcome;
}

pub fn search_params(term: &str, max_results: u32, api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("part", "snippet".to_owned()),
        ("q", term.to_owned()),
        ("maxResults", max_results.to_string()),
        ("type", "video".to_owned()),
        ("key", api_key.to_owned()),
    ]
}

/// Builds the trending query, clamping `max_results` to what the API allows.
pub fn trending_params(
    region: &str,
    max_results: u32,
    api_key: &str,
) -> Vec<(&'static str, String)> {
    let max_results = max_results.min(MAX_TRENDING_RESULTS);
    vec![
        ("part", "snippet,statistics,contentDetails".to_owned()),
        ("chart", "mostPopular".to_owned()),
        ("regionCode", region.to_owned()),
        ("maxResults", max_results.to_string()),
        ("key", api_key.to_owned()),
    ]
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "<empty body>".to_owned()
    } else {
        text.chars().take(BODY_EXCERPT_CHARS).collect()
    }
}

/// Blocking client for the YouTube Data API v3.
pub struct YouTubeClient {
    client: Client,
    api_key: SecretString,
    endpoints: Endpoints,
}

impl YouTubeClient {
    pub fn new(api_key: SecretString, endpoints: Endpoints) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            endpoints,
        })
    }

    pub fn from_config(config: &CollectConfig) -> Result<Self, QueryError> {
        let api_key = SecretString::from(config.api_key.expose_secret().to_owned());
        Self::new(api_key, config.endpoints.clone())
    }

    fn get_json(&self, url: &str, params: &[(&str, String)]) -> QueryOutcome {
        // The request URL carries the API key, so it is stripped from errors
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.bytes().map_err(reqwest::Error::without_url)?;
        if !status.is_success() {
            return Err(QueryError::Status {
                status,
                body: excerpt(&body),
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl VideoSource for YouTubeClient {
    fn search(&self, term: &str, max_results: u32) -> QueryOutcome {
        let params = search_params(term, max_results, self.api_key.expose_secret());
        self.get_json(&self.endpoints.search_url(), &params)
    }

    fn trending(&self, region: &str, max_results: u32) -> QueryOutcome {
        let params = trending_params(region, max_results, self.api_key.expose_secret());
        self.get_json(&self.endpoints.videos_url(), &params)
    }
}
