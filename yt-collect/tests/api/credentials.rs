use crate::helpers::{list_files, read_json};
use std::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt_collect::data_processing::TrendingBundle;

fn collector(bin: &str, workdir: &std::path::Path) -> Command {
    let mut command = Command::new(bin);
    command
        .current_dir(workdir)
        .env_remove("YOUTUBE_API_KEY")
        .env_remove("YOUTUBE_REGION")
        .env_remove("YOUTUBE_API_BASE_URL");
    command
}

#[test]
fn missing_api_key_exits_with_status_one_and_writes_nothing() {
    for bin in [
        env!("CARGO_BIN_EXE_yt-trending"),
        env!("CARGO_BIN_EXE_yt-search"),
    ] {
        let workdir = tempfile::tempdir().unwrap();

        let status = collector(bin, workdir.path())
            .status()
            .expect("Failed to launch collector.");

        assert_eq!(status.code(), Some(1));
        assert!(!workdir.path().join("outputs").exists());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn upstream_failure_still_exits_successfully() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let workdir = tempfile::tempdir().unwrap();
    let mut command = collector(env!("CARGO_BIN_EXE_yt-trending"), workdir.path());
    command
        .arg("US")
        .env("YOUTUBE_API_KEY", "test-api-key")
        .env("YOUTUBE_API_BASE_URL", server.uri());

    let status = tokio::task::spawn_blocking(move || command.status())
        .await
        .unwrap()
        .expect("Failed to launch collector.");

    assert_eq!(status.code(), Some(0));
    let files = list_files(&workdir.path().join("outputs"));
    assert_eq!(files.len(), 1);
    let bundle: TrendingBundle = read_json(&files[0]);
    assert_eq!(bundle.region, "US");
    assert!(bundle.items["error"].as_str().unwrap().contains("503"));
}
