//! Submit → poll → download sequencing.

use crate::error::Result;
use crate::request::{ExtractMode, TaskRequest};
use crate::types::{Event, WorkflowOutcome};
use crate::utils;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use super::DocTaskClient;

impl DocTaskClient {
    /// Run a task end to end and write its artifact to `output_path`
    ///
    /// Creates the output directory, submits the request, polls until the
    /// task completes and downloads the result. The first failing step ends
    /// the run; later steps are not attempted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use doctask::{Config, Credentials, DocTaskClient, ExtractMode, TaskRequest};
    ///
    /// # async fn example() -> doctask::Result<()> {
    /// let credentials = Credentials::from_json_file("credentials.json").await?;
    /// let client = DocTaskClient::new(Config::default(), credentials)?;
    ///
    /// let request = TaskRequest::extract("input_files/AboutFoxit.pdf", ExtractMode::Text);
    /// let outcome = client
    ///     .run(&request, "output_files/extract/AboutFoxit.txt")
    ///     .await?;
    /// println!("{} bytes written", outcome.bytes_written);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(
        &self,
        request: &TaskRequest,
        output_path: impl AsRef<Path>,
    ) -> Result<WorkflowOutcome> {
        self.run_with_cancel(request, output_path, &CancellationToken::new())
            .await
    }

    /// Run an extraction of a single file end to end
    pub async fn run_file(
        &self,
        input_path: impl AsRef<Path>,
        mode: impl Into<ExtractMode>,
        output_path: impl AsRef<Path>,
    ) -> Result<WorkflowOutcome> {
        let request = TaskRequest::extract(input_path.as_ref(), mode);
        self.run(&request, output_path).await
    }

    /// Like [`run`](Self::run), but polling stops with
    /// [`Error::Cancelled`](crate::Error::Cancelled) once `cancel` fires
    pub async fn run_with_cancel(
        &self,
        request: &TaskRequest,
        output_path: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome> {
        let endpoint = request.endpoint();

        match self.execute(request, output_path.as_ref(), cancel).await {
            Ok(outcome) => {
                tracing::info!(
                    endpoint,
                    task_id = %outcome.task_id,
                    path = %outcome.output_path.display(),
                    bytes = outcome.bytes_written,
                    "Workflow complete"
                );
                self.emit(Event::WorkflowComplete {
                    output_path: outcome.output_path.clone(),
                });
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(
                    endpoint,
                    code = e.error_code(),
                    error = %e,
                    "Workflow failed"
                );
                self.emit(Event::WorkflowFailed {
                    code: e.error_code().to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &TaskRequest,
        output_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome> {
        utils::ensure_parent_dir(output_path).await?;

        let task_id = self.submit(request).await?;
        let doc_id = self
            .poll_until_complete_with(&task_id, &self.config.poll, cancel)
            .await?;
        let saved = self.download_to_path(doc_id.clone(), output_path).await?;

        Ok(WorkflowOutcome {
            task_id,
            doc_id,
            output_path: saved.path,
            bytes_written: saved.bytes,
        })
    }
}
