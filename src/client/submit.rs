//! Task submission: input upload and task creation.

use crate::error::{Error, Result};
use crate::request::{ExtractMode, TaskRequest};
use crate::signature::SIGNATURE_PARAM;
use crate::types::{Event, TaskId};
use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::response::{self, TaskCreated};
use super::{CLIENT_ID_PARAM, DocTaskClient};

impl DocTaskClient {
    /// Submit a task and return the identifier the service assigned to it
    ///
    /// Every input file is read before anything is sent; an unreadable file
    /// fails with [`Error::Validation`] and no request is issued. The signature
    /// covers the client id and every scalar form field of the request.
    ///
    /// Submission is never retried.
    pub async fn submit(&self, request: &TaskRequest) -> Result<TaskId> {
        let endpoint = request.endpoint();
        let fields = request.form_fields();

        let mut form = Form::new();
        for (name, value) in &fields {
            form = form.text(*name, value.clone());
        }
        for file in request.files() {
            let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
                Error::validation(format!(
                    "cannot read input file '{}': {}",
                    file.path.display(),
                    e
                ))
            })?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name())
                .mime_str(file.mime_type())?;
            form = form.part(file.field, part);
        }

        let mut params = self.signing_params();
        for (name, value) in &fields {
            params.insert(*name, value.as_str());
        }
        let sn = self.sign(&params);

        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(endpoint, fields = fields.len(), "Submitting task");

        let response = self
            .http
            .post(url)
            .query(&[
                (SIGNATURE_PARAM, sn.as_str()),
                (CLIENT_ID_PARAM, self.credentials.client_id.as_str()),
            ])
            .multipart(form)
            .send()
            .await?;

        let data = response::read_envelope(endpoint, response).await?;
        let task_id =
            response::decode_data::<TaskCreated>(endpoint, data)?.into_task_id(endpoint)?;

        tracing::info!(endpoint, task_id = %task_id, "Task submitted");
        self.emit(Event::TaskSubmitted {
            endpoint: endpoint.to_string(),
            task_id: task_id.clone(),
        });

        Ok(task_id)
    }

    /// Submit an extraction task for a single file
    pub async fn submit_file(
        &self,
        file_path: impl AsRef<Path>,
        mode: impl Into<ExtractMode>,
        page_range: Option<&str>,
    ) -> Result<TaskId> {
        let mut request = TaskRequest::extract(file_path.as_ref(), mode);
        if let Some(range) = page_range {
            request = request.with_page_range(range);
        }
        self.submit(&request).await
    }
}
