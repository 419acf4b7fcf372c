// Coordinator + entity integration tests using wiremock.
//
// Each test wires a real TokenManager and coordinator against a mock
// RAPT cloud, then drives the refresh cycle and the entity read/write
// contract end to end.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use raptly_api::{ApiEndpoints, TokenManager};
use raptly_core::entity::{
    ConnectionSensor, Switch, TargetTemperatureNumber, TemperatureSensor, UtilisationNumber,
};
use raptly_core::{
    BrewZillaCoordinator, Coordinator, CoreError, RefreshStatus, TemperatureUnit,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn endpoints(server: &MockServer) -> ApiEndpoints {
    let base: url::Url = server.uri().parse().expect("mock server URI");
    let token = base.join("/token").expect("token URL");
    ApiEndpoints::custom(base, token)
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

fn brewzilla_coordinator(server: &MockServer) -> Arc<BrewZillaCoordinator> {
    let endpoints = endpoints(server);
    let http = reqwest::Client::new();
    let token_manager = Arc::new(TokenManager::new(
        http.clone(),
        endpoints.token().clone(),
        "brewer@example.com".into(),
        SecretString::from("s3cret".to_owned()),
    ));
    Arc::new(Coordinator::new(token_manager, http, endpoints))
}

// ── Refresh cycle ───────────────────────────────────────────────────

#[tokio::test]
async fn refresh_keys_snapshot_by_device_id() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "temperature": 42.0 },
            { "name": "record without id" },
            { "id": "bz-2", "temperature": 18.5 },
        ])))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["bz-1"]["temperature"], 42.0);
    assert_eq!(snapshot["bz-2"]["temperature"], 18.5);
    assert!(coordinator.status().is_ok());
}

#[tokio::test]
async fn token_is_fetched_once_across_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();
    coordinator.refresh().await.unwrap();
}

#[tokio::test]
async fn failed_refresh_retains_previous_snapshot() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    // First list succeeds once, then the endpoint starts failing.
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "temperature": 42.0 },
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();
    let before = coordinator.snapshot();

    let err = coordinator.refresh().await.unwrap_err();
    assert!(
        matches!(err, CoreError::UpdateFailed { family: "brewzilla", .. }),
        "got: {err:?}"
    );

    // Stale-but-available: the snapshot is byte-for-byte the old one.
    let after = coordinator.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after["bz-1"]["temperature"], 42.0);

    // A failure is reported distinctly from a successful empty refresh.
    assert!(matches!(coordinator.status(), RefreshStatus::Failed { .. }));
}

#[tokio::test]
async fn empty_success_is_not_a_failure() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    assert!(coordinator.snapshot().is_empty());
    assert!(coordinator.status().is_ok());
}

#[tokio::test]
async fn auth_failure_surfaces_as_update_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    let err = coordinator.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::UpdateFailed { .. }), "got: {err:?}");
}

// ── Entity write path ───────────────────────────────────────────────

#[tokio::test]
async fn applied_utilisation_write_updates_snapshot() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "heatingUtilisation": 25 },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/BrewZillas/SetHeatingUtilisation"))
        .and(query_param("brewZillaId", "bz-1"))
        .and(query_param("utilisation", "55"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let mut updates = coordinator.subscribe();
    updates.mark_unchanged();

    let number = UtilisationNumber::heating(Arc::clone(&coordinator), "bz-1");
    assert_eq!(number.value(), 25);

    assert!(number.set(55).await.unwrap());
    assert_eq!(number.value(), 55);
    assert_eq!(coordinator.snapshot()["bz-1"]["heatingUtilisation"], 55);

    // Subscribers are re-rendered after the optimistic apply.
    assert!(updates.has_changed().unwrap());
}

#[tokio::test]
async fn rejected_write_leaves_snapshot_untouched() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "heatingUtilisation": 25 },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/BrewZillas/SetHeatingUtilisation"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let number = UtilisationNumber::heating(Arc::clone(&coordinator), "bz-1");
    assert!(!number.set(55).await.unwrap());
    assert_eq!(number.value(), 25);
}

#[tokio::test]
async fn out_of_range_utilisation_never_reaches_the_api() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/BrewZillas/SetHeatingUtilisation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let number = UtilisationNumber::heating(Arc::clone(&coordinator), "bz-1");
    let err = number.set(101).await.unwrap_err();
    assert!(matches!(err, CoreError::OutOfRange { .. }), "got: {err:?}");
}

#[tokio::test]
async fn switch_commits_state_after_applied_write() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "heatingEnabled": false },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/BrewZillas/SetHeatingEnabled"))
        .and(query_param("state", "true"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let switch = Switch::heating(Arc::clone(&coordinator), "bz-1");
    assert!(!switch.is_on());
    assert!(switch.turn_on().await.unwrap());
    assert!(switch.is_on());
}

#[tokio::test]
async fn write_before_first_refresh_is_not_ready() {
    let server = MockServer::start().await;
    let coordinator = brewzilla_coordinator(&server);

    let switch = Switch::heating(Arc::clone(&coordinator), "bz-1");
    let err = switch.turn_on().await.unwrap_err();
    assert!(matches!(err, CoreError::NotReady { .. }), "got: {err:?}");
}

// ── Unit conversion ─────────────────────────────────────────────────

#[tokio::test]
async fn fahrenheit_setpoint_round_trips_without_double_conversion() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "targetTemperature": 20.0 },
        ])))
        .mount(&server)
        .await;
    // The wire value must be native Celsius: 68 °F entered -> target=20.
    Mock::given(method("POST"))
        .and(path("/BrewZillas/SetTargetTemperature"))
        .and(query_param("target", "20"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let number = TargetTemperatureNumber::brewzilla(
        Arc::clone(&coordinator),
        "bz-1",
        TemperatureUnit::Fahrenheit,
    );
    assert_eq!(number.value(), 68.0);

    assert!(number.set(68.0).await.unwrap());
    // Stored value stays native; rendering converts again.
    assert_eq!(coordinator.snapshot()["bz-1"]["targetTemperature"], 20.0);
    assert_eq!(number.value(), 68.0);
}

#[tokio::test]
async fn temperature_sensor_renders_in_display_unit() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bz-1", "temperature": 20.0 },
        ])))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let celsius =
        TemperatureSensor::new(Arc::clone(&coordinator), "bz-1", TemperatureUnit::Celsius);
    let fahrenheit =
        TemperatureSensor::new(Arc::clone(&coordinator), "bz-1", TemperatureUnit::Fahrenheit);

    assert_eq!(celsius.value(), 20.0);
    assert_eq!(fahrenheit.value(), 68.0);
}

// ── Read defaults ───────────────────────────────────────────────────

#[tokio::test]
async fn absent_device_reads_fall_back_to_defaults() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/BrewZillas/GetBrewZillas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let coordinator = brewzilla_coordinator(&server);
    coordinator.refresh().await.unwrap();

    let temperature =
        TemperatureSensor::new(Arc::clone(&coordinator), "ghost", TemperatureUnit::Fahrenheit);
    let connection = ConnectionSensor::new(Arc::clone(&coordinator), "ghost");
    let utilisation = UtilisationNumber::heating(Arc::clone(&coordinator), "ghost");
    let switch = Switch::heating(Arc::clone(&coordinator), "ghost");

    // Absent numeric readings are 0.0 -- never a converted default.
    assert_eq!(temperature.value(), 0.0);
    assert_eq!(connection.state(), "Disconnected");
    assert!(!connection.is_connected());
    assert_eq!(utilisation.value(), 0);
    assert!(!switch.is_on());
}
