use std::time::Duration;

use indexmap::IndexMap;
use routegen_lib::{GeneratorError, IntrospectionClient, RetryPolicy};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(10),
        ..RetryPolicy::default()
    }
}

fn client() -> IntrospectionClient {
    IntrospectionClient::new(fast_policy(), IndexMap::new()).unwrap()
}

fn payload() -> serde_json::Value {
    json!([
        {
            "name": "GetUser",
            "path": "/api/user",
            "verb": "get",
            "input": { "type": "object", "properties": {} },
            "output": { "type": "object", "properties": {} }
        }
    ])
}

#[tokio::test]
async fn fetch_returns_operations() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/__introspect", mock_server.uri());
    let ops = client().fetch(&url).await.unwrap();

    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].name, "GetUser");
}

#[tokio::test]
async fn fetch_sends_configured_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .and(header("Authorization", "Bearer dev-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = IndexMap::new();
    headers.insert("Authorization".to_string(), "Bearer dev-token".to_string());
    let client = IntrospectionClient::new(fast_policy(), headers).unwrap();

    let url = format!("{}/__introspect", mock_server.uri());
    assert!(client.fetch(&url).await.is_ok());
}

#[tokio::test]
async fn fetch_succeeds_when_a_later_attempt_succeeds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/__introspect", mock_server.uri());
    let ops = client().fetch(&url).await.unwrap();
    assert_eq!(ops.len(), 1);
}

#[tokio::test]
async fn fetch_gives_up_after_the_retry_budget() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/__introspect", mock_server.uri());
    match client().fetch(&url).await.unwrap_err() {
        GeneratorError::Transport {
            url: failed_url,
            attempts,
            message,
        } => {
            assert_eq!(failed_url, url);
            assert_eq!(attempts, 3);
            assert!(message.contains("500"), "{message}");
        }
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn shape_errors_are_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "operations": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/__introspect", mock_server.uri());
    let err = client().fetch(&url).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Shape(_)));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/__introspect", mock_server.uri());
    let err = client().fetch(&url).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(1),
        ..RetryPolicy::default()
    };
    let client = IntrospectionClient::new(policy, IndexMap::new()).unwrap();

    // Port 9 (discard) is closed on test machines.
    let err = client.fetch("http://127.0.0.1:9/__introspect").await.unwrap_err();
    assert!(matches!(err, GeneratorError::Transport { attempts: 2, .. }));
}

#[tokio::test]
async fn slow_responses_time_out_and_count_as_failed_attempts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload())
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(1),
        timeout: Duration::from_millis(100),
    };
    let client = IntrospectionClient::new(policy, IndexMap::new()).unwrap();

    let url = format!("{}/__introspect", mock_server.uri());
    let err = client.fetch(&url).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Transport { attempts: 2, .. }));
}
