use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::TempDir;
use wiremock::MockServer;
use yt_collect::collect::{RunArtifacts, run_search, run_trending};
use yt_collect::config::{CollectConfig, Mode};
use yt_collect::data_processing::YouTubeClient;
use yt_collect::telemetry::{get_subscriber, init_subscriber};

pub const TEST_API_KEY: &str = "test-api-key";

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

/// A mock YouTube API plus a scratch directory for the collector's output.
pub struct TestCollector {
    pub server: MockServer,
    pub workdir: TempDir,
}

impl TestCollector {
    pub async fn spawn() -> Self {
        // `TRACING` is only executed the first time `spawn` is invoked.
        LazyLock::force(&TRACING);

        let server = MockServer::start().await;
        let workdir = tempfile::tempdir().expect("Failed to create temporary directory");
        Self { server, workdir }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.workdir.path().join("outputs")
    }

    pub fn config(&self, mode: Mode, args: &[&str]) -> CollectConfig {
        self.config_with_base_url(mode, args, &self.server.uri())
    }

    pub fn config_with_base_url(&self, mode: Mode, args: &[&str], base_url: &str) -> CollectConfig {
        let args: Vec<String> = args.iter().map(|&s| s.to_owned()).collect();
        let env = [
            ("YOUTUBE_API_KEY", TEST_API_KEY),
            ("YOUTUBE_API_BASE_URL", base_url),
        ]
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        let mut config = CollectConfig::from_env_map(mode, &args, Some(env))
            .expect("Failed to build configuration.");
        config.output_dir = self.output_dir();
        config
    }

    /// Runs a collector on a blocking thread so the mock server keeps serving.
    pub async fn run(&self, config: CollectConfig) -> RunArtifacts {
        tokio::task::spawn_blocking(move || {
            let client = YouTubeClient::from_config(&config).expect("Failed to build client.");
            match config.mode {
                Mode::Search => run_search(config, &client),
                Mode::Trending => run_trending(config, &client),
            }
        })
        .await
        .expect("Collector thread panicked.")
        .expect("Failed to persist results.")
    }

    /// Files in the output directory, sorted by name.
    pub fn output_files(&self) -> Vec<PathBuf> {
        list_files(&self.output_dir())
    }
}

pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.expect("Failed to read entry").path()).collect(),
        Err(_) => vec![],
    };
    files.sort();
    files
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> T {
    let text = std::fs::read_to_string(path).expect("Failed to read output file.");
    serde_json::from_str(&text).expect("Output file is not valid JSON.")
}

/// A closed local port, for provoking connection errors.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind port.");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
