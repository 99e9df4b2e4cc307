//! Integration tests for the Weatherstack client using wiremock
//!
//! These run the real HTTP client against a mock server to check query
//! parameters, provider errors, transport failures and the dashboard flow.

use chrono::NaiveDate;
use weatherstack_core::{
    DashboardController, FailurePolicy, HistoricalQuery, MarineQuery, Tab, WeatherClient,
    WeatherError, WeatherstackClient, render::CurrentView,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn new_york_response() -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "New York", "country": "United States" },
        "current": {
            "temperature": 20,
            "humidity": 60,
            "wind_speed": 10,
            "wind_dir": "NW",
            "feelslike": 19,
            "weather_descriptions": ["Sunny"],
            "weather_icons": ["http://x/icon.png"]
        }
    })
}

fn city_not_found_response() -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": { "code": 615, "type": "request_failed", "info": "City not found" }
    })
}

fn create_test_client(mock_server: &MockServer) -> WeatherstackClient {
    WeatherstackClient::new("TEST_KEY").with_base_url(mock_server.uri())
}

// ============================================================================
// Current
// ============================================================================

#[tokio::test]
async fn test_get_current_sends_key_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("access_key", "TEST_KEY"))
        .and(query_param("query", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_york_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let snapshot = client.get_current("New York").await.expect("snapshot");

    assert_eq!(snapshot.location.name, "New York");
    assert_eq!(snapshot.current.temperature, 20);

    let view = CurrentView::from(&snapshot);
    assert_eq!(view.temperature, "20°");
    assert_eq!(view.description, "Sunny");
    assert_eq!(view.humidity, "60%");
}

#[tokio::test]
async fn test_get_current_provider_error_is_not_a_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(city_not_found_response()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_current("Atlantis").await.unwrap_err();

    assert!(!err.is_transport());
    assert_eq!(err.to_string(), "City not found");
    assert_eq!(err.provider_error().map(|e| e.code), Some(615));
}

#[tokio::test]
async fn test_get_current_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_york_response()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let first = client.get_current("Paris").await.expect("first");
    let second = client.get_current("Paris").await.expect("second");

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_current("Paris").await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, WeatherError::Status { .. }));
    assert!(err.to_string().contains("upstream down"));
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_current("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::Decode { .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = WeatherstackClient::new("TEST_KEY").with_base_url(uri);
    let err = client.get_current("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::Transport { .. }));
}

#[tokio::test]
async fn test_transport_error_does_not_leak_access_key() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = WeatherstackClient::new("SUPER_SECRET_KEY").with_base_url(uri);
    let err = client.get_current("Paris").await.unwrap_err();

    assert!(err.is_transport());
    assert!(!err.to_string().contains("SUPER_SECRET_KEY"));
    assert!(!format!("{err:?}").contains("SUPER_SECRET_KEY"));
}

// ============================================================================
// Historical & marine
// ============================================================================

#[tokio::test]
async fn test_get_historical_sends_date_and_hourly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/historical"))
        .and(query_param("query", "London"))
        .and(query_param("historical_date", "2015-01-21"))
        .and(query_param("hourly", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom" },
            "historical": {
                "2015-01-21": {
                    "date": "2015-01-21",
                    "mintemp": 1,
                    "maxtemp": 6,
                    "hourly": [
                        { "time": "0", "temperature": 2 },
                        { "time": "1200", "temperature": 5 }
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let snapshot = client
        .get_historical(&HistoricalQuery::new("London", "2015-01-21"))
        .await
        .expect("historical snapshot");

    assert_eq!(snapshot.historical["2015-01-21"].hourly.len(), 2);
}

#[tokio::test]
async fn test_get_marine_plan_restriction_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/marine"))
        .and(query_param("query", "36.1,-5.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": {
                "code": 105,
                "type": "function_access_restricted",
                "info": "Access Restricted - Your current Subscription Plan does not support this API Function."
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_marine(&MarineQuery::new(36.1, -5.35)).await.unwrap_err();

    let provider = err.provider_error().expect("provider error");
    assert_eq!(provider.kind.as_deref(), Some("function_access_restricted"));
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_submit_then_not_found_keeps_stale() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("query", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_york_response()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("query", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(city_not_found_response()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let mut dash = DashboardController::new(FailurePolicy::KeepStale);

    assert!(dash.submit(&client).await);
    assert_eq!(
        dash.displayed_snapshot().map(|s| s.location.name.as_str()),
        Some("New York")
    );

    dash.set_query("Atlantis");
    assert!(dash.submit(&client).await);
    assert_eq!(dash.current_state().error(), Some("City not found"));
    assert_eq!(
        dash.displayed_snapshot().map(|s| s.location.name.as_str()),
        Some("New York")
    );
}

#[tokio::test]
async fn test_dashboard_tabs_make_no_requests() {
    let mock_server = MockServer::start().await;

    // Only the initial search on the current tab may reach the server
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_york_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let mut dash = DashboardController::default();
    assert!(dash.submit(&client).await);

    dash.select_tab(Tab::History);
    dash.set_history_date(NaiveDate::from_ymd_opt(2020, 2, 29).expect("valid date"));
    dash.select_tab(Tab::Marine);
    dash.set_marine_coords(MarineQuery::new(43.3, 5.4));
    dash.select_tab(Tab::Current);

    assert_eq!(
        dash.displayed_snapshot().map(|s| s.location.name.as_str()),
        Some("New York")
    );
    mock_server.verify().await;
}
