//! Typed response envelopes
//!
//! Every JSON response shares the shape `{code, message, data}`. A request
//! succeeds only when the HTTP status is 2xx and `code == 0`; anything else is
//! turned into [`Error::Api`] carrying the raw body.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::types::{DocId, TaskId, TaskStatus};

/// Common response envelope
///
/// Read field by field from a [`serde_json::Value`], so one odd member (a
/// string `code`, both `message` and `msg`) does not hide the others.
#[derive(Debug, Default)]
struct Envelope {
    code: Option<i64>,
    message: Option<String>,
    data: Option<serde_json::Value>,
}

impl Envelope {
    fn from_value(value: serde_json::Value) -> Self {
        let serde_json::Value::Object(mut fields) = value else {
            return Self::default();
        };
        let text = |v: Option<serde_json::Value>| match v {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        };
        let message = text(fields.remove("message")).or_else(|| text(fields.remove("msg")));

        Self {
            code: fields.get("code").and_then(serde_json::Value::as_i64),
            message,
            data: fields.remove("data").filter(|d| !d.is_null()),
        }
    }

    fn detail(&self) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|d| d.get("detail"))
            .and_then(|d| d.as_str())
            .map(str::to_string)
    }
}

/// `data` of a task-creation response
#[derive(Debug, Deserialize)]
pub(crate) struct TaskCreated {
    #[serde(rename = "taskInfo")]
    task_info: TaskCreatedInfo,
}

#[derive(Debug, Deserialize)]
struct TaskCreatedInfo {
    #[serde(rename = "taskId", alias = "taskid")]
    task_id: String,
}

impl TaskCreated {
    pub(crate) fn into_task_id(self, endpoint: &str) -> Result<TaskId> {
        if self.task_info.task_id.is_empty() {
            return Err(Error::validation(format!(
                "{} returned an empty task id",
                endpoint
            )));
        }
        Ok(TaskId::from(self.task_info.task_id))
    }
}

/// `data` of a status response
#[derive(Debug, Deserialize)]
pub(crate) struct TaskStatusData {
    #[serde(rename = "taskInfo")]
    task_info: TaskStatusInfo,
}

#[derive(Debug, Deserialize)]
struct TaskStatusInfo {
    percentage: i64,
    #[serde(default, rename = "docId", alias = "docid")]
    doc_id: Option<String>,
}

impl TaskStatusData {
    /// Check the invariants the poller relies on
    pub(crate) fn into_status(self, endpoint: &str) -> Result<TaskStatus> {
        let TaskStatusInfo { percentage, doc_id } = self.task_info;
        let percentage = u8::try_from(percentage)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| {
                Error::validation(format!(
                    "{} returned percentage {} outside 0..=100",
                    endpoint, percentage
                ))
            })?;
        let doc_id = doc_id.filter(|id| !id.is_empty()).map(DocId::from);

        if percentage == 100 && doc_id.is_none() {
            return Err(Error::validation(format!(
                "{} reported completion without a document id",
                endpoint
            )));
        }

        Ok(TaskStatus {
            percentage,
            doc_id: if percentage == 100 { doc_id } else { None },
        })
    }
}

/// Build the error for a response the service marked as failed
pub(crate) fn api_error(endpoint: &str, status: reqwest::StatusCode, body: String) -> Error {
    let envelope = serde_json::from_str(&body)
        .map(Envelope::from_value)
        .unwrap_or_default();

    Error::Api {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        code: envelope.code,
        detail: envelope.detail(),
        message: envelope.message.unwrap_or_else(|| status_reason(status)),
        body,
    }
}

fn status_reason(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}

/// Read a JSON response and return its `data` once the service reports success
pub(crate) async fn read_envelope(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<serde_json::Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(endpoint, status, body));
    }

    let envelope = serde_json::from_str(&body)
        .map(Envelope::from_value)
        .map_err(|e| {
            Error::validation(format!("{} returned malformed JSON: {}", endpoint, e))
        })?;

    match envelope.code {
        Some(0) => Ok(envelope.data.unwrap_or(serde_json::Value::Null)),
        Some(_) => Err(api_error(endpoint, status, body)),
        None if envelope.detail().is_some() => Err(api_error(endpoint, status, body)),
        None => Err(Error::validation(format!(
            "{} response is missing the result code",
            endpoint
        ))),
    }
}

/// Decode the `data` member into the endpoint's typed shape
pub(crate) fn decode_data<T: DeserializeOwned>(
    endpoint: &str,
    data: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        Error::validation(format!("{} returned an unexpected shape: {}", endpoint, e))
    })
}
