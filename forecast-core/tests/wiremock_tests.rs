//! Integration tests for the forecast client using wiremock
//!
//! A real `reqwest::Client` talks to a mock api.weather.gov, so these cover
//! URL construction, status handling and request counts end to end.

use std::time::Duration;

use forecast_core::{ForecastError, WeatherClient};
use reqwest::StatusCode;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const LAT: f64 = 39.7456;
const LON: f64 = -97.0892;
const POINTS_PATH: &str = "/points/39.7456,-97.0892";
const FORECAST_PATH: &str = "/gridpoints/TOP/31,80/forecast";

fn points_response(mock_server: &MockServer) -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "forecast": format!("{}{}", mock_server.uri(), FORECAST_PATH)
        }
    })
}

fn forecast_response() -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "periods": [{ "name": "Today", "temperature": 70 }]
        }
    })
}

async fn mount(mock_server: &MockServer, at: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .expect(times)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_get_forecast_two_stage_lookup() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(points_response(&mock_server)),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_json(forecast_response()),
        1,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    assert_eq!(result.unwrap(), forecast_response());
}

#[tokio::test]
async fn test_session_is_reused_across_clients() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(points_response(&mock_server)),
        2,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_json(forecast_response()),
        2,
    )
    .await;

    let session = reqwest::Client::new();
    for _ in 0..2 {
        let client = WeatherClient::with_base_url(&session, mock_server.uri());
        client.get_forecast(LAT, LON).await.expect("lookup should succeed");
    }
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_points_error_never_requests_forecast() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(404).set_body_string("Unable to provide data for requested point"),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_json(forecast_response()),
        0,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    match result {
        Err(ForecastError::Http { status, url, body }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(url, format!("{}{}", mock_server.uri(), POINTS_PATH));
            assert!(body.contains("Unable to provide data"));
        }
        other => panic!("Expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_forecast_field_never_requests_forecast() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "properties": {} })),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_json(forecast_response()),
        0,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(
        matches!(result, Err(ForecastError::MissingField { .. })),
        "Expected MissingField, got: {result:?}"
    );
}

#[tokio::test]
async fn test_forecast_error_after_one_request_each() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(points_response(&mock_server)),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(503).set_body_string("Unavailable"),
        1,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(
        matches!(result, Err(ForecastError::Http { status: StatusCode::SERVICE_UNAVAILABLE, .. })),
        "Expected Http 503, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_string("not valid json"),
        1,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(
        matches!(result, Err(ForecastError::Decode { .. })),
        "Expected Decode, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_forecast_json_after_one_request_each() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(points_response(&mock_server)),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        1,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    match result {
        Err(ForecastError::Decode { url, .. }) => {
            assert_eq!(url, format!("{}{}", mock_server.uri(), FORECAST_PATH));
        }
        other => panic!("Expected Decode error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_points_without_properties_never_requests_forecast() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        POINTS_PATH,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({})),
        1,
    )
    .await;
    mount(
        &mock_server,
        FORECAST_PATH,
        ResponseTemplate::new(200).set_body_json(forecast_response()),
        0,
    )
    .await;

    let session = reqwest::Client::new();
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(
        matches!(result, Err(ForecastError::MissingField { .. })),
        "Expected MissingField, got: {result:?}"
    );
}

#[tokio::test]
async fn test_session_timeout_surfaces_as_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(points_response(&mock_server))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let session = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("Failed to build client");
    let client = WeatherClient::with_base_url(&session, mock_server.uri());
    let result = client.get_forecast(LAT, LON).await;

    assert!(
        matches!(result, Err(ForecastError::Transport { .. })),
        "Expected Transport, got: {result:?}"
    );
}
