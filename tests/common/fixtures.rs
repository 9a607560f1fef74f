//! Mock service fixtures and test content

use doctask::{Config, Credentials, DocTaskClient, SigningParams};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "integration-client";
pub const SECRET_KEY: &str = "integration-secret";

/// Smallest artifact the tests download: the PDF magic bytes
pub const PDF_MAGIC: &[u8] = &[0x25, 0x50, 0x44, 0x46];

/// Poll interval used against the mock service
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Start a mock service and a client pointed at its `/api` root
pub async fn mock_service() -> (MockServer, DocTaskClient) {
    let server = MockServer::start().await;
    let mut config = Config::with_base_url(format!("{}/api", server.uri()));
    config.poll.interval = POLL_INTERVAL;
    let client = DocTaskClient::new(config, Credentials::new(CLIENT_ID, SECRET_KEY))
        .expect("Failed to create client");
    (server, client)
}

/// Signature for `params` plus the test client id
pub fn signature_for(params: &[(&str, &str)]) -> String {
    let mut signing: SigningParams = params.iter().copied().collect();
    signing.insert("clientId", CLIENT_ID);
    doctask::sign(&signing, SECRET_KEY).to_string()
}

/// Success envelope around `data`
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "success",
        "data": data,
    }))
}

/// Mount a status endpoint that reports each percentage once, in order,
/// then reports completion with `doc_id` for every later query
pub async fn mount_progress(server: &MockServer, percentages: &[i64], doc_id: &str) {
    for percentage in percentages {
        Mock::given(method("GET"))
            .and(path("/api/task"))
            .respond_with(success(json!({"taskInfo": {"percentage": percentage}})))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/task"))
        .respond_with(success(
            json!({"taskInfo": {"percentage": 100, "docId": doc_id}}),
        ))
        .mount(server)
        .await;
}

/// Mount the download endpoint for `doc_id`
pub async fn mount_artifact(server: &MockServer, doc_id: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path("/api/download"))
        .and(wiremock::matchers::query_param("docId", doc_id))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}
