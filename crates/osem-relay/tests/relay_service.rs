// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end relay tests: config -> handle -> worker -> mock server.

use mockito::Matcher;
use osem_relay::{Record, Relay, RelayConfig, RelayError, TracingSink};
use osem_units::UnitSystem;
use std::time::Duration;

const BOX_ID: &str = "5f0c0d1e2a3b4c5d6e7f8091";

fn config_for(server_url: &str, extra_upload: &str) -> RelayConfig {
    let toml = format!(
        r#"
[station]
box_id = "{BOX_ID}"
auth_key = "relay-secret"
server_url = "{server_url}"

[upload]
timeout_secs = 5
max_tries = 2
retry_wait_secs = 0
{extra_upload}

[sensors.outTemp]
sensor_id = "S1"
unit = "degree_C"

[sensors.outHumidity]
sensor_id = "S2"
"#
    );
    RelayConfig::from_toml_str(&toml).expect("config")
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn us_record(t: i64) -> Record {
    Record::new(t, UnitSystem::Us)
        .with("outTemp", 51.26)
        .with("outHumidity", 72.0)
}

#[tokio::test]
async fn test_relay_uploads_submitted_records() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("/boxes/{}/data", BOX_ID).as_str())
        .match_header("authorization", "relay-secret")
        .match_body(Matcher::JsonString(r#"{"S1":"10.7","S2":"72"}"#.into()))
        .with_status(201)
        .with_body("\"Measurements saved in box\"")
        .expect(2)
        .create_async()
        .await;

    let config = config_for(&server.url(), "");
    let (handle, worker) = Relay::spawn(config, TracingSink::default()).expect("spawn");

    assert!(handle.submit(us_record(now())));
    assert!(handle.submit(us_record(now() + 1)));
    handle.close();
    assert!(!handle.submit(us_record(now() + 2)));

    let stats = tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker did not finish")
        .expect("join");

    assert_eq!(stats.posted, 2);
    assert_eq!(stats.attempts, 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_relay_retries_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let config = config_for(&server.url(), "");
    let (handle, worker) = Relay::spawn(config, TracingSink::default()).expect("spawn");

    handle.submit(us_record(now()));
    handle.close();

    let stats = tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker did not finish")
        .expect("join");

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.attempts, 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_relay_skip_upload_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server.url(), "skip_upload = true");
    let (handle, worker) = Relay::spawn(config, TracingSink::default()).expect("spawn");

    handle.submit(us_record(now()));
    handle.close();

    let stats = tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker did not finish")
        .expect("join");

    assert_eq!(stats.skipped_upload, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_relay_drops_stale_records() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server.url(), "stale_secs = 60");
    let (handle, worker) = Relay::spawn(config, TracingSink::default()).expect("spawn");

    handle.submit(us_record(now() - 3_600));
    handle.close();

    let stats = tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker did not finish")
        .expect("join");

    assert_eq!(stats.stale, 1);
    assert_eq!(stats.attempts, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_relay_stop_rejects_further_records() {
    let server = mockito::Server::new_async().await;
    let config = config_for(&server.url(), "skip_upload = true");
    let (handle, worker) = Relay::spawn(config, TracingSink::default()).expect("spawn");

    handle.stop();
    let stats = tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker did not stop")
        .expect("join");

    assert_eq!(stats.processed(), 0);
    assert!(!handle.submit(us_record(now())));
    assert_eq!(handle.backlog_len(), 0);
    assert_eq!(handle.evicted(), 0);
}

#[tokio::test]
async fn test_relay_rejects_invalid_config() {
    let mut config = config_for("http://localhost:1", "");
    config.upload.max_tries = 0;

    match Relay::spawn(config, TracingSink::default()) {
        Err(RelayError::Config(_)) => {}
        Err(other) => panic!("expected config error, got {}", other),
        Ok(_) => panic!("invalid config accepted"),
    }
}

#[tokio::test]
async fn test_relay_rejects_auth_key_before_building_client() {
    let mut config = config_for("http://localhost:1", "");
    config.station.auth_key = "relay\nsecret".into();

    match Relay::spawn(config, TracingSink::default()) {
        Err(RelayError::Config(err)) => assert!(err.to_string().contains("station.auth_key")),
        Err(other) => panic!("expected config error, got {}", other),
        Ok(_) => panic!("invalid auth key accepted"),
    }
}
