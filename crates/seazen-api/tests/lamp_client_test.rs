#![allow(clippy::unwrap_used)]
// Integration tests for `LampClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seazen_api::{Error, LampClient, LampInfo, LampState, PowerCommand, StateUpdate, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LampClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = LampClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Classification ──────────────────────────────────────────────────

#[tokio::test]
async fn test_info_success_parses_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ver": "0.14.4",
            "name": "Seazen",
            "ip": "192.168.1.44",
            "leds": { "count": 60 }
        })))
        .mount(&server)
        .await;

    let resp = client.info(Duration::from_secs(2)).await.unwrap();
    assert!(resp.ok);
    assert_eq!(resp.status, 200);

    let info: LampInfo = resp.parse().unwrap();
    assert_eq!(info.name.as_deref(), Some("Seazen"));
    assert_eq!(info.station_ip(), Some("192.168.1.44"));
    assert!(info.extra.contains_key("leds"));
}

#[tokio::test]
async fn test_non_json_body_is_tolerated() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captive</html>"))
        .mount(&server)
        .await;

    let resp = client.info(Duration::from_secs(2)).await.unwrap();
    assert!(resp.ok);
    assert!(resp.json.is_none());
    assert_eq!(resp.text, "<html>captive</html>");
    assert!(matches!(
        resp.parse::<LampInfo>(),
        Err(Error::Deserialization { .. })
    ));
}

#[tokio::test]
async fn test_http_error_is_a_response_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/json/state"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": 9 })))
        .mount(&server)
        .await;

    let resp = client.state().await.unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.json, Some(json!({ "error": 9 })));
}

#[tokio::test]
async fn test_slow_lamp_is_classified_as_timeout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let result = client.info(Duration::from_millis(100)).await;
    match result {
        Err(ref e @ Error::Timeout { timeout_ms }) => {
            assert_eq!(timeout_ms, 100);
            assert!(e.is_transient());
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = LampClient::new(base_url, &TransportConfig::default()).unwrap();

    let result = client.info(Duration::from_secs(2)).await;
    match result {
        Err(ref e @ Error::Unreachable { ref url, .. }) => {
            assert!(url.ends_with("/json/info"), "unexpected url: {url}");
            assert!(e.is_transient());
            assert!(!e.is_timeout());
        }
        other => panic!("expected Unreachable, got: {other:?}"),
    }
}

// ── Control ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_state_posts_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/json/state"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "on": "t" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "on": false, "bri": 10 })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .set_state(&StateUpdate::power(PowerCommand::Toggle))
        .await
        .unwrap();
    let state: LampState = resp.parse().unwrap();
    assert!(!state.on);
    assert_eq!(state.bri, 10);
}
