//! Workflow tests against a mock service, using only the public API.
//!
//! ```bash
//! cargo test --test workflow
//! ```

mod common;

use common::*;
use doctask::{
    Config, Credentials, DocTaskClient, Error, Event, ExtractMode, TaskId, TaskRequest,
    run_with_shutdown,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn extract_workflow_writes_artifact_bytes() {
    let (server, client) = mock_service().await;

    let submit_sn = signature_for(&[("mode", "extractText")]);
    Mock::given(method("POST"))
        .and(path("/api/document/extract"))
        .and(query_param("sn", submit_sn.as_str()))
        .and(query_param("clientId", CLIENT_ID))
        .respond_with(success(json!({"taskInfo": {"taskId": "T1"}})))
        .expect(1)
        .mount(&server)
        .await;
    mount_progress(&server, &[10, 45], "D1").await;
    mount_artifact(&server, "D1", PDF_MAGIC).await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("AboutFoxit.pdf");
    std::fs::write(&input, b"%PDF-1.7 input document").unwrap();
    let output = dir.path().join("output_files/extract/AboutFoxit.pdf");

    let mut events = client.subscribe();
    let outcome = client
        .run_file(&input, ExtractMode::Text, &output)
        .await
        .unwrap();

    assert_eq!(outcome.task_id, TaskId::new("T1"));
    assert_eq!(outcome.output_path, output);
    assert_eq!(outcome.bytes_written, PDF_MAGIC.len() as u64);
    assert_eq!(std::fs::read(&output).unwrap(), PDF_MAGIC);

    let received = server.received_requests().await.unwrap();
    let status_queries = received
        .iter()
        .filter(|r| r.url.path() == "/api/task")
        .count();
    assert_eq!(status_queries, 3);

    let mut progress = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Event::TaskProgress { percentage, .. } = event {
            progress.push(percentage);
        }
    }
    assert_eq!(progress, vec![10, 45, 100]);
}

#[tokio::test]
async fn submit_failure_is_api_error_with_exit_code() {
    let (server, client) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/api/document/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 7,
            "message": "Invalid file",
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pdf");
    std::fs::write(&input, b"not really a pdf").unwrap();

    let err = client
        .run(
            &TaskRequest::extract(&input, "extractText"),
            dir.path().join("broken.txt"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { code: Some(7), .. }), "got {:?}", err);
    assert_eq!(err.error_code(), "api_error");
    assert_eq!(err.exit_code(), 4);
    assert!(!dir.path().join("broken.txt").exists());
}

#[tokio::test]
async fn run_with_shutdown_completes_without_signal() {
    let (server, client) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/api/document/flatten"))
        .respond_with(success(json!({"taskInfo": {"taskId": "T9"}})))
        .mount(&server)
        .await;
    mount_progress(&server, &[], "D9").await;
    mount_artifact(&server, "D9", b"%PDF-flattened").await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("form.pdf");
    std::fs::write(&input, b"%PDF form").unwrap();
    let request = TaskRequest::Flatten {
        input,
        page_range: None,
    };

    let outcome = run_with_shutdown(&client, &request, dir.path().join("flat.pdf"))
        .await
        .unwrap();
    assert_eq!(outcome.bytes_written, 14);
}

#[tokio::test]
async fn client_from_config_and_credential_files() {
    let server = wiremock::MockServer::start().await;
    mount_progress(&server, &[50], "D2").await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("doctask.json");
    std::fs::write(
        &config_path,
        json!({
            "base_url": format!("{}/api", server.uri()),
            "poll": {"interval": 20},
        })
        .to_string(),
    )
    .unwrap();
    let credentials_path = dir.path().join("credentials.json");
    std::fs::write(
        &credentials_path,
        json!({"client_credentials": {"client_id": CLIENT_ID, "secret_id": SECRET_KEY}})
            .to_string(),
    )
    .unwrap();

    let config = Config::from_json_file(&config_path).await.unwrap();
    let credentials = Credentials::from_json_file(&credentials_path).await.unwrap();
    let client = DocTaskClient::new(config, credentials).unwrap();

    let doc_id = client
        .poll_until_complete(&TaskId::new("T2"))
        .await
        .unwrap();
    assert_eq!(doc_id.as_str(), "D2");

    let received = server.received_requests().await.unwrap();
    let sn = received[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "sn")
        .map(|(_, v)| v.into_owned());
    assert_eq!(sn, Some(signature_for(&[("taskId", "T2")])));
}
