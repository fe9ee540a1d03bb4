//! End-to-end tests: HTTP endpoint → parse → evaluate → sink

use pretty_assertions::assert_eq;
use server_stats_monitor::actors::CycleOutcome;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_overloaded_server_raises_every_alert_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("35,1000,900,5000,4900,100000,95000"),
        )
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    let outcome = handle.poll_now().await.unwrap();

    assert_eq!(outcome, CycleOutcome::Evaluated { alerts: 4 });
    assert_eq!(
        recorded(&lines),
        vec![
            "Load Average is too high: 35.00",
            "Memory usage too high: 90.00%",
            "Free disk space is too low: 0.00 Mb left",
            "Network bandwidth usage high: 0.04 Mbit/s available",
        ]
    );

    shutdown(handle).await;
}

#[tokio::test]
async fn test_healthy_server_is_silent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(payload(
            0.42,
            (16_000_000_000, 4_000_000_000),
            (500_000_000_000, 100_000_000_000),
            (125_000_000, 1_000_000),
        )))
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    assert_eq!(
        handle.poll_now().await.unwrap(),
        CycleOutcome::Evaluated { alerts: 0 }
    );
    assert!(recorded(&lines).is_empty());

    shutdown(handle).await;
}

#[tokio::test]
async fn test_realistic_disk_and_network_figures() {
    let mock_server = MockServer::start().await;

    // 1 GiB disk with 50 MiB free, 100 Mbit/s link with 4 Mbit/s spare
    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(payload(
            2.0,
            (1000, 100),
            (1024 * 1024 * 1024, 974 * 1024 * 1024),
            (12_500_000, 12_000_000),
        )))
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);
    handle.poll_now().await.unwrap();

    assert_eq!(
        recorded(&lines),
        vec![
            "Free disk space is too low: 50.00 Mb left",
            "Network bandwidth usage high: 4.00 Mbit/s available",
        ]
    );

    shutdown(handle).await;
}

#[tokio::test]
async fn test_persisting_condition_re_alerts_every_cycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("31,10,1,10,1,10,1"))
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    handle.poll_now().await.unwrap();
    handle.poll_now().await.unwrap();

    assert_eq!(
        recorded(&lines),
        vec![
            "Load Average is too high: 31.00",
            "Load Average is too high: 31.00",
        ]
    );

    shutdown(handle).await;
}
