//! BDD step definitions for the aggregated dashboard feature

use cucumber::{given, then, when};
use serde_json::json;

use vayu_dashboard::{AirType, DashboardError, FallbackPolicy};

use crate::world::{Reply, VayuWorld};

fn composite_path(device: &str) -> String {
    format!("/api/v1/dashboard/data/{}", device)
}

fn history_path(device: &str) -> String {
    format!("/api/v1/sensor/history/{}", device)
}

#[given(expr = "the backend has a sensor reading for {string} with PM2.5 of {float}")]
fn backend_has_reading(world: &mut VayuWorld, device: String, pm25: f64) {
    let body = json!({"readings": [
        {"timestamp": "2024-05-01T10:00:00Z", "pm25": pm25, "co2": 650.0, "co": 0.3, "voc": 0.1}
    ]});
    world
        .http
        .route(&history_path(&device), Reply::Json(200, body.to_string()));
}

#[given(expr = "the backend has no sensor history for {string}")]
fn backend_has_no_history(world: &mut VayuWorld, device: String) {
    world.http.route(
        &history_path(&device),
        Reply::Json(200, json!({"readings": []}).to_string()),
    );
}

#[given(expr = "the sensor history endpoint for {string} responds with status {int}")]
fn history_responds_with(world: &mut VayuWorld, device: String, status: u16) {
    world.http.route(
        &history_path(&device),
        Reply::Json(status, r#"{"detail": "boom"}"#.to_string()),
    );
}

#[given(expr = "the backend reports the fan on at {int} percent")]
fn backend_fan_on(world: &mut VayuWorld, intensity: u8) {
    let mut automatic = world.http.automatic.lock().unwrap();
    automatic.fan_on = true;
    automatic.fan_intensity = intensity;
}

#[given(expr = "the backend has {int} audit log entries")]
fn backend_has_logs(world: &mut VayuWorld, count: usize) {
    let mut logs = world.http.logs.lock().unwrap();
    *logs = (0..count)
        .map(|i| {
            json!({
                "event_type": "decision",
                "timestamp": "2024-05-01T09:00:00Z",
                "device_id": "ESP32_001",
                "hash": format!("0x{:08x}", i),
                "data": {"seq": i}
            })
        })
        .collect();
}

#[given(expr = "the composite endpoint for {string} returns a full view with air type {string}")]
fn composite_returns_full_view(world: &mut VayuWorld, device: String, air_type: String) {
    let body = json!({
        "current_reading": {"timestamp": "2024-05-01T10:00:00Z", "pm25": 60.0, "co2": 900.0, "co": 2.0, "voc": 0.6},
        "prediction": {"will_peak": true, "confidence": 0.9, "reasoning": "traffic peak"},
        "classification": {"air_type": air_type, "confidence": 0.85, "reasoning": "NO2 signature"},
        "control_status": {"fan_on": true, "fan_intensity": 90},
        "recent_faults": [],
        "system_health": {"status": "healthy"},
        "recent_logs": []
    });
    world
        .http
        .route(&composite_path(&device), Reply::Json(200, body.to_string()));
}

#[given(expr = "the composite endpoint for {string} returns a full view with an audit event of type {string}")]
fn composite_returns_unmodelled_fields(world: &mut VayuWorld, device: String, event_type: String) {
    let body = json!({
        "current_reading": {"timestamp": "2024-05-01T10:00:00Z", "pm25": 30.0, "co2": 800.0,
                            "humidity": 51.0},
        "prediction": {"will_peak": false, "confidence": 0.6, "reasoning": "steady"},
        "classification": {"air_type": "incense", "confidence": 0.55, "reasoning": "sweet VOC"},
        "control_status": {"fan_on": true, "fan_intensity": 60, "is_override": true},
        "recent_faults": [],
        "system_health": {"status": "healthy"},
        "recent_logs": [
            {"event_type": event_type, "timestamp": "2024-05-01T09:59:00Z",
             "device_id": device.clone(), "hash": "0x01", "block": 88}
        ]
    });
    world
        .http
        .route(&composite_path(&device), Reply::Json(200, body.to_string()));
    world.composite_body = Some(body);
}

#[given(expr = "the composite endpoint for {string} responds with status {int}")]
fn composite_responds_with(world: &mut VayuWorld, device: String, status: u16) {
    world.http.route(
        &composite_path(&device),
        Reply::Json(status, r#"{"detail": "Not implemented"}"#.to_string()),
    );
}

#[given(expr = "the composite endpoint for {string} refuses connections")]
fn composite_refuses(world: &mut VayuWorld, device: String) {
    world.http.route(&composite_path(&device), Reply::Refused);
}

#[given("the client only falls back when the composite endpoint is not implemented")]
fn strict_policy(world: &mut VayuWorld) {
    world.fallback_policy = FallbackPolicy::NotImplementedOnly;
}

#[when(expr = "the aggregated view for {string} is requested")]
async fn request_aggregated_view(world: &mut VayuWorld, device: String) {
    let client = world.client();
    world.view_result = Some(client.get_aggregated_dashboard_data(&device).await);
}

#[then("the view should be complete")]
fn view_is_complete(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    assert!(!view.is_partial());
    assert_eq!(view.health_status(), Some("healthy"));
}

#[then(expr = "the classification should be {string}")]
fn classification_is(world: &mut VayuWorld, expected: String) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    let expected: AirType = serde_json::from_value(json!(expected)).unwrap();
    assert_eq!(view.classification.as_ref().unwrap().air_type, expected);
}

#[then("the view should be partial")]
fn view_is_partial(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    assert!(view.is_partial());
    assert_eq!(view.health_status(), Some("partial_data"));
}

#[then("the view should re-serialize to the composite payload")]
fn view_matches_composite(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    let expected = world.composite_body.as_ref().expect("no composite payload");
    assert_eq!(&serde_json::to_value(view).unwrap(), expected);
}

#[then("prediction and classification should be unavailable")]
fn ai_fields_unavailable(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    let value = serde_json::to_value(view).unwrap();
    assert!(value["prediction"].is_null());
    assert!(value["classification"].is_null());
}

#[then("there should be no recent faults")]
fn no_recent_faults(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    assert!(view.recent_faults.is_empty());
}

#[then(expr = "the current reading should have PM2.5 of {float}")]
fn current_reading_pm25(world: &mut VayuWorld, expected: f64) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    let reading = view.current_reading.as_ref().expect("no current reading");
    assert_eq!(reading.pm25, Some(expected));
}

#[then("the current reading should be unset")]
fn current_reading_unset(world: &mut VayuWorld) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    assert!(view.current_reading.is_none());
}

#[then(expr = "the fan should be on at {int} percent")]
fn fan_on_at(world: &mut VayuWorld, intensity: u8) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    let control = view.control_status.as_ref().expect("no control status");
    assert!(control.fan_on);
    assert_eq!(control.fan_intensity, intensity);
}

#[then(expr = "the view should contain {int} log entries")]
fn view_log_count(world: &mut VayuWorld, count: usize) {
    let view = world.view_result.as_ref().expect("no result").as_ref().unwrap();
    assert_eq!(view.recent_logs.len(), count);
}

#[then("the request should fail with an aggregation error")]
fn fails_with_aggregation_error(world: &mut VayuWorld) {
    let result = world.view_result.as_ref().expect("no result");
    match result {
        Err(DashboardError::AggregationFailed(cause)) => {
            assert!(matches!(**cause, DashboardError::BackendUnavailable { .. }));
        }
        other => panic!("expected AggregationFailed, got {other:?}"),
    }
}

#[then("the request should fail with a backend error")]
fn fails_with_backend_error(world: &mut VayuWorld) {
    let result = world.view_result.as_ref().expect("no result");
    assert!(
        matches!(result, Err(DashboardError::BackendUnavailable { .. })),
        "{result:?}"
    );
}

#[then("only the composite endpoint should have been called")]
fn only_composite_called(world: &mut VayuWorld) {
    let requests = world.http.requests.lock().unwrap();
    assert_eq!(requests.len(), 1, "{requests:?}");
    assert!(requests[0].starts_with("GET /api/v1/dashboard/data/"));
}
