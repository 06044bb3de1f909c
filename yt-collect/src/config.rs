use config::{Config, Environment, Map};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Keywords searched when none are given on the command line.
pub const DEFAULT_KEYWORDS: [&str; 3] = ["python tutorial", "how to code", "youtube api"];
pub const DEFAULT_REGION: &str = "JP";
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const SEARCH_MAX_RESULTS: u32 = 5;
pub const TRENDING_MAX_RESULTS: u32 = 10;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("YOUTUBE_API_KEY environment variable is not set.")]
    MissingApiKey,
    #[error("Failed to read settings from the environment: {0}")]
    Environment(#[from] config::ConfigError),
}

/// Which of the two collectors is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Trending,
}

/// Root of the YouTube Data API, overridable so a local mock can stand in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url }
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    pub fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url)
    }
}

/// Raw `YOUTUBE_*` variables, before defaults are applied.
#[derive(Deserialize, Debug, Default)]
struct EnvSettings {
    api_key: Option<String>,
    region: Option<String>,
    api_base_url: Option<String>,
}

impl EnvSettings {
    /// Reads the process environment, or `source` in its place when given.
    fn load(source: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix("YOUTUBE").source(source))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Everything a single run needs, resolved once at startup.
#[derive(Debug)]
pub struct CollectConfig {
    pub api_key: SecretString,
    pub mode: Mode,
    pub keywords: Vec<String>,
    pub region: String,
    pub max_results: u32,
    pub output_dir: PathBuf,
    pub endpoints: Endpoints,
}

impl CollectConfig {
    /// Configuration for the keyword collector; `args` are the search terms.
    pub fn for_search(args: &[String]) -> Result<Self, ConfigError> {
        Self::from_env_map(Mode::Search, args, None)
    }

    /// Configuration for the trending collector; `args` may hold a region code.
    pub fn for_trending(args: &[String]) -> Result<Self, ConfigError> {
        Self::from_env_map(Mode::Trending, args, None)
    }

    /// Like `for_search`/`for_trending`, but reading variables from `env`
    /// instead of the process environment when `env` is `Some`.
    pub fn from_env_map(
        mode: Mode,
        args: &[String],
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let env = EnvSettings::load(env)?;
        let api_key = non_empty(env.api_key).ok_or(ConfigError::MissingApiKey)?;
        let endpoints = non_empty(env.api_base_url)
            .map(Endpoints::new)
            .unwrap_or_default();

        let (keywords, region, max_results) = match mode {
            Mode::Search => {
                let keywords = if args.is_empty() {
                    DEFAULT_KEYWORDS.iter().map(|&k| k.to_owned()).collect()
                } else {
                    args.to_vec()
                };
                // Searches are not scoped to a region, so YOUTUBE_REGION is ignored
                (keywords, DEFAULT_REGION.to_owned(), SEARCH_MAX_RESULTS)
            }
            Mode::Trending => {
                if args.len() > 1 {
                    tracing::warn!("Ignoring extra arguments after region: {:?}", &args[1..]);
                }
                let region = non_empty(args.first().cloned())
                    .or_else(|| non_empty(env.region))
                    .unwrap_or_else(|| DEFAULT_REGION.to_owned());
                (vec![], region, TRENDING_MAX_RESULTS)
            }
        };

        Ok(Self {
            api_key: SecretString::from(api_key),
            mode,
            keywords,
            region,
            max_results,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            endpoints,
        })
    }
}
