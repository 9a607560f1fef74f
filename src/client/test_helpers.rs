//! Shared test helpers for running DocTaskClient against a mock service.

use crate::config::{Config, Credentials};
use crate::client::DocTaskClient;
use crate::signature::{self, SigningParams};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub(crate) const CLIENT_ID: &str = "test-client";
pub(crate) const SECRET_KEY: &str = "test-secret";

/// Poll interval used by test clients
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Config pointing at the mock server's `/api` root with a short poll interval
pub(crate) fn test_config(server: &MockServer) -> Config {
    let mut config = Config::with_base_url(format!("{}/api", server.uri()));
    config.poll.interval = POLL_INTERVAL;
    config
}

/// Start a mock service and a client wired to it
pub(crate) async fn create_test_client() -> (DocTaskClient, MockServer) {
    let server = MockServer::start().await;
    let client = client_for(test_config(&server));
    (client, server)
}

/// Client with test credentials and a custom config
pub(crate) fn client_for(config: Config) -> DocTaskClient {
    DocTaskClient::new(config, Credentials::new(CLIENT_ID, SECRET_KEY)).unwrap()
}

/// Signature the client is expected to send for `params` plus the client id
pub(crate) fn expected_sn(params: &[(&str, &str)]) -> String {
    let mut signing: SigningParams = params.iter().copied().collect();
    signing.insert("clientId", CLIENT_ID);
    signature::sign(&signing, SECRET_KEY).to_string()
}

/// Write an input document into `dir`
pub(crate) fn write_input(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// 200 response with a success envelope around `data`
pub(crate) fn ok_envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "success",
        "data": data,
    }))
}

/// Successful task creation
pub(crate) fn task_created(task_id: &str) -> ResponseTemplate {
    ok_envelope(json!({"taskInfo": {"taskId": task_id}}))
}

/// Successful status reading
pub(crate) fn task_status(percentage: i64, doc_id: Option<&str>) -> ResponseTemplate {
    let mut task_info = json!({"percentage": percentage});
    if let Some(doc_id) = doc_id {
        task_info["docId"] = json!(doc_id);
    }
    ok_envelope(json!({"taskInfo": task_info}))
}

/// Error envelope with a detail message
pub(crate) fn api_failure(status: u16, code: i64, detail: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "code": code,
        "message": "Task error",
        "data": {"detail": detail},
    }))
}

/// The service's "task is running" error
pub(crate) fn task_running() -> ResponseTemplate {
    api_failure(400, 1001, "Error: The task is running.")
}

/// Replays a fixed list of responses, repeating the last one, and records
/// when each request arrived
pub(crate) struct SequenceResponder {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl SequenceResponder {
    pub(crate) fn new(responses: Vec<ResponseTemplate>) -> (Self, Arc<Mutex<Vec<Instant>>>) {
        assert!(!responses.is_empty());
        let arrivals = Arc::new(Mutex::new(Vec::new()));
        let responder = Self {
            responses,
            calls: AtomicUsize::new(0),
            arrivals: Arc::clone(&arrivals),
        };
        (responder, arrivals)
    }
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let last = self.responses.len() - 1;
        self.responses[index.min(last)].clone()
    }
}

/// Requests the mock server received for `path`
pub(crate) async fn requests_to(server: &MockServer, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

/// Value of a query parameter on a received request
pub(crate) fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
