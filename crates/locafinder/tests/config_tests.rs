//! Integration tests for configuration files.

use std::io::Write;

use locafinder::Error;
use locafinder::config::LocafinderConfig;
use locafinder::map::{HeadlessSurface, MapController, SelectionRetention};
use locafinder::net::LngLat;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[webhooks]
predict = "http://localhost:5678/webhook/predict"

[http]
timeout_secs = 5
user_agent = "locafinder-tests"

[map]
center = [106.7, 10.77]
initial_zoom = 11.0
retention = "keep"
"#
    )
    .unwrap();

    let config = LocafinderConfig::load(file.path()).unwrap();

    assert_eq!(config.webhooks.predict, "http://localhost:5678/webhook/predict");
    assert!(config.webhooks.chat.ends_with("/aichat"));
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.map.retention, SelectionRetention::Keep);

    let http = config.http_client().unwrap();
    assert_eq!(http.options().user_agent.as_deref(), Some("locafinder-tests"));

    let map = MapController::mount(HeadlessSurface::new(), config.map.clone());
    assert_eq!(map.config().center, LngLat::new(106.7, 10.77));
    assert_eq!(map.selection().retention(), SelectionRetention::Keep);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = LocafinderConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigIo { .. }));
}

#[test]
fn test_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[map\ncenter = 1").unwrap();

    let err = LocafinderConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}
