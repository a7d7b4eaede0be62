//! 设置加载集成测试
//!
//! 覆盖"设置文件 → 档案定义 → 控制器"的完整链路和文件级行为

use serial_test::serial;
use statuspage_tray::controller::{FailurePolicy, StatusController};
use statuspage_tray::profile::HttpStatusFetcher;
use statuspage_tray::settings::{JsonSettingsLoader, SettingsLoader};
use statuspage_tray::severity::Severity;
use std::sync::Arc;
use std::time::Duration;

fn build_controller() -> StatusController {
    let fetcher = Arc::new(HttpStatusFetcher::new(Duration::from_secs(2)).unwrap());
    StatusController::new(fetcher, FailurePolicy::FailFast)
}

#[tokio::test]
async fn test_settings_file_drives_controller_to_ready() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/status.json")
        .with_status(200)
        .with_body(r#"{"status":{"indicator":"minor"}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let content = format!(
        r#"{{"profiles":[{{"name":"Mock","hostname":"{}"}}],"refresh_interval_seconds":5}}"#,
        server.url()
    );
    tokio::fs::write(&path, content).await.unwrap();

    let loader = JsonSettingsLoader::new(false);
    let settings = loader.load_from_file(&path).await.unwrap();
    assert_eq!(settings.refresh_interval_seconds, 5);

    let mut controller = build_controller();
    controller.load_profiles(&settings.profiles).unwrap();
    assert!(controller.is_ready());

    let report = controller.refresh_all().await.unwrap();
    assert_eq!(report.aggregate, Severity::Minor);
}

#[tokio::test]
async fn test_missing_settings_file_creates_zero_profile_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf").join("settings.json");
    assert!(!path.exists());

    let loader = JsonSettingsLoader::new(false);
    let settings = loader.load_from_file(&path).await.unwrap();

    assert!(path.exists());
    assert!(settings.profiles.is_empty());

    // 零档案配置可以正常走完刷新过程，聚合级别取正常
    let mut controller = build_controller();
    controller.load_profiles(&settings.profiles).unwrap();
    let report = controller.refresh_all().await.unwrap();
    assert_eq!(report.aggregate, Severity::None);
}

#[tokio::test]
async fn test_malformed_settings_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    tokio::fs::write(&path, "{ not json !").await.unwrap();

    let loader = JsonSettingsLoader::new(false);
    let result = loader.load_from_file(&path).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("JSON解析失败"));
}

#[tokio::test]
async fn test_definition_missing_hostname_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    tokio::fs::write(
        &path,
        r#"{"profiles":[{"name":"A","hostname":"a.test"},{"name":"B"}]}"#,
    )
    .await
    .unwrap();

    let loader = JsonSettingsLoader::new(false);
    let result = loader.load_from_file(&path).await;
    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn test_env_substitution_in_settings_file() {
    std::env::set_var("MOCK_STATUS_HOST", "https://status.internal.test");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    tokio::fs::write(
        &path,
        r#"{"profiles":[{"name":"Internal","hostname":"${MOCK_STATUS_HOST}"}]}"#,
    )
    .await
    .unwrap();

    let loader = JsonSettingsLoader::new(true);
    let settings = loader.load_from_file(&path).await.unwrap();
    assert_eq!(
        settings.profiles[0].hostname,
        "https://status.internal.test"
    );

    std::env::remove_var("MOCK_STATUS_HOST");
}
