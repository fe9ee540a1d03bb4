//! Failure tests: unreachable endpoint, bad status codes, malformed payloads

use pretty_assertions::assert_eq;
use server_stats_monitor::{actors::CycleOutcome, config::Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

const UNREACHABLE: &str = "Unable to fetch server statistic";

#[tokio::test]
async fn test_three_server_errors_escalate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    assert_eq!(
        handle.poll_now().await.unwrap(),
        CycleOutcome::Failed { streak: 1 }
    );
    assert_eq!(
        handle.poll_now().await.unwrap(),
        CycleOutcome::Failed { streak: 2 }
    );
    assert!(recorded(&lines).is_empty());

    assert_eq!(
        handle.poll_now().await.unwrap(),
        CycleOutcome::Failed { streak: 3 }
    );
    assert_eq!(recorded(&lines), vec![UNREACHABLE]);

    // the comparison is re-evaluated on every failure
    handle.poll_now().await.unwrap();
    assert_eq!(recorded(&lines), vec![UNREACHABLE, UNREACHABLE]);

    shutdown(handle).await;
}

#[tokio::test]
async fn test_malformed_payloads_count_as_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not,a,valid,payload"))
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    for _ in 0..3 {
        assert!(!handle.poll_now().await.unwrap().is_success());
    }

    assert_eq!(recorded(&lines), vec![UNREACHABLE]);

    shutdown(handle).await;
}

#[tokio::test]
async fn test_recovery_resets_streak() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("1,10,1,10,1,10,1"))
        .up_to_n_times(1)
        .with_priority(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(3)
        .mount(&mock_server)
        .await;

    let (handle, lines) = spawn_test_poller(&mock_server);

    let outcomes = [
        handle.poll_now().await.unwrap(),
        handle.poll_now().await.unwrap(),
        handle.poll_now().await.unwrap(),
        handle.poll_now().await.unwrap(),
    ];

    assert_eq!(
        outcomes,
        [
            CycleOutcome::Failed { streak: 1 },
            CycleOutcome::Failed { streak: 2 },
            CycleOutcome::Evaluated { alerts: 0 },
            CycleOutcome::Failed { streak: 1 },
        ]
    );
    assert!(recorded(&lines).is_empty());

    shutdown(handle).await;
}

#[tokio::test]
async fn test_unreachable_host() {
    let (sink, lines) = recording_sink();
    let config = Config {
        // Nothing listens on port 9 (discard) on the loopback interface
        url: "http://127.0.0.1:9/_stats".to_string(),
        interval: 3600,
        timeout: 2,
        ..Config::default()
    };
    let handle =
        server_stats_monitor::actors::PollerHandle::spawn_with_config(&config, sink).unwrap();

    for _ in 0..3 {
        handle.poll_now().await.unwrap();
    }

    assert_eq!(recorded(&lines), vec![UNREACHABLE]);

    shutdown(handle).await;
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("1,10,1,10,1,10,1")
                .set_delay(std::time::Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let (sink, _lines) = recording_sink();
    let config = Config {
        timeout: 1,
        ..create_test_config(&mock_server)
    };
    let handle =
        server_stats_monitor::actors::PollerHandle::spawn_with_config(&config, sink).unwrap();

    assert_eq!(
        handle.poll_now().await.unwrap(),
        CycleOutcome::Failed { streak: 1 }
    );

    shutdown(handle).await;
}
