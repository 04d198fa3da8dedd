//! HTTP transport tests against a local mock provider.

use cardex_core::{
    CardexError, ClientConfig, Document, ExtractionClient, ExtractionMode, HttpTransport, Transport,
};
use mockito::Matcher;
use serde_json::json;

const BASE_PATH: &str = "/v1/products/acme/business_card/v1";

fn config(server: &mockito::ServerGuard) -> ClientConfig {
    ClientConfig::new("secret")
        .with_base_url(format!("{}{}/", server.url(), BASE_PATH))
        .with_poll(2, 0)
}

fn prediction_body() -> String {
    json!({
        "document": { "inference": { "prediction": {
            "name": [{ "value": "Jane Doe", "confidence": 0.95 }],
            "company_names": [{ "value": "Acme", "confidence": 0.8 }]
        }}}
    })
    .to_string()
}

#[tokio::test]
async fn test_sync_request_shape() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("{}/predict", BASE_PATH).as_str())
        .match_header("authorization", "Token secret")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::Regex(r#"name="document""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(prediction_body())
        .create_async()
        .await;

    let client = ExtractionClient::new(config(&server)).unwrap();
    let record = client
        .extract(
            &Document::classify("https://example.com/card.jpg"),
            ExtractionMode::Sync,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.company, "Acme");
    assert_eq!(record.confidence, 0.95);
}

#[tokio::test]
async fn test_binary_upload_uses_file_part() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("{}/predict", BASE_PATH).as_str())
        .match_body(Matcher::Regex(r#"filename="business_card.jpg""#.to_string()))
        .with_status(200)
        .with_body(prediction_body())
        .create_async()
        .await;

    let client = ExtractionClient::new(config(&server)).unwrap();
    let record = client
        .extract_sync(&Document::classify("data:image/jpeg;base64,aGVsbG8="))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(record.name, "Jane Doe");
}

#[tokio::test]
async fn test_non_success_status_is_provider_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", format!("{}/predict", BASE_PATH).as_str())
        .with_status(401)
        .with_body(r#"{"api_request":{"error":"bad token"}}"#)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(&server)).unwrap();
    let err = client
        .extract(&Document::RawBytes(vec![1, 2, 3]), ExtractionMode::Sync)
        .await
        .unwrap_err();

    match err {
        CardexError::Provider { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_async_submit_and_poll() {
    let mut server = mockito::Server::new_async().await;
    let submit = server
        .mock("POST", format!("{}/predict_async", BASE_PATH).as_str())
        .match_header("authorization", "Token secret")
        .with_status(202)
        .with_body(json!({ "job_id": "abc-123" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut completed: serde_json::Value = serde_json::from_str(&prediction_body()).unwrap();
    completed["status"] = json!("completed");
    let poll = server
        .mock("GET", format!("{}/documents/queue/abc-123", BASE_PATH).as_str())
        .match_header("authorization", "Token secret")
        .with_status(200)
        .with_body(completed.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(&server)).unwrap();
    let record = client
        .extract(&Document::RawBytes(vec![0xFF, 0xD8, 0xFF]), ExtractionMode::Async)
        .await
        .unwrap();

    submit.assert_async().await;
    poll.assert_async().await;
    assert_eq!(record.name, "Jane Doe");
}

#[tokio::test]
async fn test_pending_until_attempts_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let poll = server
        .mock("GET", format!("{}/documents/queue/slow", BASE_PATH).as_str())
        .with_status(200)
        .with_body(r#"{"status":"processing"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = ExtractionClient::new(config(&server)).unwrap();
    let err = client
        .poll_job("slow", client.poll_options())
        .await
        .unwrap_err();

    poll.assert_async().await;
    assert!(matches!(err, CardexError::Timeout { attempts: 2, .. }));
}

#[tokio::test]
async fn test_transport_url_joining() {
    let server = mockito::Server::new_async().await;
    let transport = HttpTransport::new(&config(&server)).unwrap();

    assert_eq!(
        transport.url("/predict"),
        format!("{}{}/predict", server.url(), BASE_PATH)
    );
    // No mock registered for this path.
    assert!(transport.get_json("missing").await.is_err());
}

#[test]
fn test_client_requires_api_key() {
    let err = ExtractionClient::new(ClientConfig::default()).err().unwrap();
    assert!(matches!(err, CardexError::Config(_)));
}
