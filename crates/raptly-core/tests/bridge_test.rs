// Bridge lifecycle tests using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use raptly_api::ApiEndpoints;
use raptly_core::{Bridge, BridgeConfig, CoreError, TemperatureUnit};

// ── Helpers ─────────────────────────────────────────────────────────

fn endpoints(server: &MockServer) -> ApiEndpoints {
    let base: url::Url = server.uri().parse().expect("mock server URI");
    let token = base.join("/token").expect("token URL");
    ApiEndpoints::custom(base, token)
}

fn config(poll_interval: Duration) -> BridgeConfig {
    BridgeConfig {
        email: "brewer@example.com".into(),
        api_secret: SecretString::from("s3cret".to_owned()),
        temperature_unit: TemperatureUnit::Celsius,
        poll_interval,
        use_dev_api: false,
        request_timeout: Duration::from_secs(5),
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

async fn mount_families(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "name": "Brew Rig", "temperature": 42.0 },
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Hydrometers/GetHydrometers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "pill-1", "gravity": 1.052, "battery": 87.3 },
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/TemperatureControllers/GetTemperatureControllers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "tc-1", "temperature": 18.0 },
        ])))
        .mount(server)
        .await;
}

async fn list_request_count(server: &MockServer, list_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.url.path() == list_path)
        .count()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn start_populates_every_family_before_returning() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_families(&server).await;

    let bridge = Bridge::with_endpoints(config(Duration::from_secs(3600)), endpoints(&server))
        .expect("bridge construction is offline");
    bridge.start().await.unwrap();

    assert_eq!(bridge.brewzillas().snapshot().len(), 1);
    assert_eq!(bridge.hydrometers().snapshot().len(), 1);
    assert_eq!(bridge.temperature_controllers().snapshot().len(), 1);
    assert!(bridge.brewzillas().status().is_ok());

    bridge.shutdown().await;
}

#[tokio::test]
async fn start_fails_when_a_family_list_fails() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let bridge = Bridge::with_endpoints(config(Duration::from_secs(3600)), endpoints(&server))
        .expect("bridge construction is offline");

    let err = bridge.start().await.unwrap_err();
    assert!(
        matches!(err, CoreError::UpdateFailed { family: "brewzilla", .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn polling_continues_until_shutdown() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_families(&server).await;

    let bridge = Bridge::with_endpoints(config(Duration::from_millis(100)), endpoints(&server))
        .expect("bridge construction is offline");
    bridge.start().await.unwrap();

    // First refresh happened in start(); at least one poll tick follows.
    tokio::time::sleep(Duration::from_millis(350)).await;
    let while_running = list_request_count(&server, "/BrewZillas/GetBrewZillas").await;
    assert!(while_running >= 2, "expected poll ticks, saw {while_running}");

    bridge.shutdown().await;

    let at_shutdown = list_request_count(&server, "/BrewZillas/GetBrewZillas").await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    let after_shutdown = list_request_count(&server, "/BrewZillas/GetBrewZillas").await;
    assert_eq!(at_shutdown, after_shutdown, "polling survived shutdown");
}
