//! Checks that the client logs transport failures exactly once at `error`
//! level, and keeps provider-reported errors out of the error log.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};
use weatherstack_core::{WeatherClient, WeatherstackClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Counts `error` events emitted from this crate.
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR && meta.target().starts_with("weatherstack_core") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn capture(counter: &ErrorCounter) -> tracing::subscriber::DefaultGuard {
    tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()))
}

/// Run one `/current` request against a server answering with `response`
/// and return how many error events it produced.
async fn error_logs_for(response: ResponseTemplate) -> usize {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    let counter = ErrorCounter::default();
    let _guard = capture(&counter);

    let client = WeatherstackClient::new("TEST_KEY").with_base_url(mock_server.uri());
    let _ = client.get_current("Paris").await;

    counter.count()
}

#[tokio::test]
async fn test_status_error_logged_once() {
    let logs = error_logs_for(ResponseTemplate::new(503).set_body_string("upstream down")).await;
    assert_eq!(logs, 1);
}

#[tokio::test]
async fn test_malformed_body_logged_once() {
    let logs = error_logs_for(ResponseTemplate::new(200).set_body_string("<html>")).await;
    assert_eq!(logs, 1);
}

#[tokio::test]
async fn test_unexpected_error_value_logged_once() {
    let body = serde_json::json!({ "success": false, "error": "quota" });
    let logs = error_logs_for(ResponseTemplate::new(200).set_body_json(body)).await;
    assert_eq!(logs, 1);
}

#[tokio::test]
async fn test_shape_mismatch_logged_once() {
    let body = serde_json::json!({ "location": { "name": "Paris" } });
    let logs = error_logs_for(ResponseTemplate::new(200).set_body_json(body)).await;
    assert_eq!(logs, 1);
}

#[tokio::test]
async fn test_provider_error_not_logged_as_error() {
    let body = serde_json::json!({
        "success": false,
        "error": { "code": 615, "type": "request_failed", "info": "City not found" }
    });
    let logs = error_logs_for(ResponseTemplate::new(200).set_body_json(body)).await;
    assert_eq!(logs, 0);
}

#[tokio::test]
async fn test_connection_refused_logged_once() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let counter = ErrorCounter::default();
    let _guard = capture(&counter);

    let client = WeatherstackClient::new("TEST_KEY").with_base_url(uri);
    assert!(client.get_current("Paris").await.is_err());

    assert_eq!(counter.count(), 1);
}
