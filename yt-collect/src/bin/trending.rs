use anyhow::Context;
use std::process::ExitCode;
use yt_collect::collect::run_trending;
use yt_collect::config::{CollectConfig, ConfigError};
use yt_collect::data_processing::YouTubeClient;
use yt_collect::telemetry::{get_subscriber, init_subscriber};

fn try_main(config: CollectConfig) -> anyhow::Result<()> {
    let client = YouTubeClient::from_config(&config).context("Failed to build HTTP client")?;
    run_trending(config, &client).context("Failed to save trending results")?;
    Ok(())
}

/// Fetches the current trending chart for a region into outputs/
fn main() -> ExitCode {
    init_subscriber(get_subscriber("info".into(), std::io::stdout));

    // Region code can be passed as the only argument, or via YOUTUBE_REGION
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match CollectConfig::for_trending(&args) {
        Ok(config) => config,
        Err(ConfigError::MissingApiKey) => {
            tracing::error!("Error: YOUTUBE_API_KEY environment variable is not set.");
            tracing::error!(
                "Set it in GitHub Actions secrets (YOUTUBE_API_KEY) or pass it in the environment."
            );
            return ExitCode::FAILURE;
        }
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match try_main(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
